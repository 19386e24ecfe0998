//! JSON output.

use serde::Serialize;

/// Pretty printed JSON of the full result. Counts are decimal strings.
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Block;

    #[test]
    fn test_render_json_block_info() {
        let block: Block = "192.168.1.0/30".parse().unwrap();
        let json = render_json(&block.info()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["cidr"], "192.168.1.0/30");
        assert_eq!(value["first_usable"], "192.168.1.1");
        assert_eq!(value["usable_hosts"], "2");
        assert_eq!(value["version"], "V4");
    }
}
