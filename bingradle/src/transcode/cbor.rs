//! CBOR transcoding.
//!
//! Documents become determinate-length maps with text keys in source order;
//! sequences and record lists become arrays; text and booleans map to their
//! CBOR counterparts.

use libgradle::Document;

/// Encode a document as CBOR bytes.
pub fn encode(doc: &Document) -> Result<Vec<u8>, String> {
    let mut buf = Vec::new();
    ciborium::ser::into_writer(doc, &mut buf).map_err(|e| format!("CBOR encode error: {}", e))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ciborium::value::Value as CborValue;
    use libgradle::parse_text;

    fn decode(bytes: &[u8]) -> CborValue {
        ciborium::de::from_reader(bytes).unwrap()
    }

    fn lookup<'a>(map: &'a CborValue, key: &str) -> &'a CborValue {
        map.as_map()
            .unwrap()
            .iter()
            .find(|(k, _)| k.as_text() == Some(key))
            .map(|(_, v)| v)
            .unwrap()
    }

    #[test]
    fn test_encode_map_in_source_order() {
        let doc = parse_text("b '1'\na true").unwrap();
        let value = decode(&encode(&doc).unwrap());
        let keys: Vec<_> = value
            .as_map()
            .unwrap()
            .iter()
            .map(|(k, _)| k.as_text().unwrap().to_string())
            .collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(lookup(&value, "a"), &CborValue::Bool(true));
        assert_eq!(lookup(&value, "b"), &CborValue::Text("1".into()));
    }

    #[test]
    fn test_encode_repository_entry() {
        let doc = parse_text("repositories {\n  google()\n}").unwrap();
        let value = decode(&encode(&doc).unwrap());
        let repos = lookup(&value, "repositories").as_array().unwrap();
        assert_eq!(lookup(&repos[0], "type"), &CborValue::Text("unknown".into()));
        let data = lookup(&repos[0], "data");
        assert_eq!(lookup(data, "name"), &CborValue::Text("google()".into()));
    }
}
