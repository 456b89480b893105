fn main() {
    println!("Run `cargo test -p wire-compat` to execute wire compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use serde::Deserialize;
    use serde::de::DeserializeOwned;
    use tfs_upload_protocol::{
        ByteRange, FormField, MultipartEncoder, OCTET_STREAM, format_range, hash_bytes,
    };

    /// Returns the path to the fixtures directory.
    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Loads and deserializes a fixture file.
    fn load_fixture<T: DeserializeOwned>(name: &str) -> T {
        let path = fixtures_dir().join(name);
        let data = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()));
        serde_json::from_str(&data)
            .unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", path.display()))
    }

    #[derive(Deserialize)]
    struct RangeCase {
        start: u64,
        end: u64,
        total: u64,
        expected: String,
    }

    #[derive(Deserialize)]
    struct HashCase {
        input: String,
        expected: String,
    }

    #[derive(Deserialize)]
    struct ChunkCase {
        description: String,
        item: String,
        workspace_name: String,
        workspace_owner: String,
        file_contents: String,
        start: usize,
        end: usize,
        expected_hash: String,
        expected_content_type: String,
        expected_body_lines: Vec<String>,
    }

    #[test]
    fn ranges_match_fixture() {
        let cases: Vec<RangeCase> = load_fixture("ranges.json");
        assert!(!cases.is_empty());
        for c in cases {
            assert_eq!(format_range(c.start, c.end, c.total), c.expected);
            let range = ByteRange::new(c.start, c.end, c.total).unwrap();
            assert_eq!(range.to_string(), c.expected);
        }
    }

    #[test]
    fn hashes_match_fixture() {
        let cases: Vec<HashCase> = load_fixture("hashes.json");
        for c in cases {
            assert_eq!(
                hash_bytes(c.input.as_bytes()).as_str(),
                c.expected,
                "hash of {:?}",
                c.input
            );
        }
    }

    #[test]
    fn upload_chunks_match_fixture_bytes() {
        let cases: Vec<ChunkCase> = load_fixture("upload_chunks.json");
        assert!(!cases.is_empty());

        for c in cases {
            let whole = c.file_contents.as_bytes();
            let total = whole.len() as u64;
            let digest = hash_bytes(whole);
            assert_eq!(digest.as_str(), c.expected_hash, "{}", c.description);

            let range = ByteRange::new(c.start as u64, c.end as u64, total).unwrap();
            let filename = c.item.rsplit('/').next().unwrap();

            let encoder = MultipartEncoder::new()
                .text(FormField::Item.as_str(), c.item.as_str())
                .text(FormField::WorkspaceName.as_str(), c.workspace_name.as_str())
                .text(FormField::WorkspaceOwner.as_str(), c.workspace_owner.as_str())
                .text(FormField::FileLength.as_str(), total.to_string())
                .text(FormField::Hash.as_str(), digest.as_str())
                .text(FormField::Range.as_str(), range.to_string())
                .file(
                    FormField::Content.as_str(),
                    filename,
                    OCTET_STREAM,
                    &whole[c.start..c.end],
                )
                .unwrap();

            assert_eq!(encoder.content_type(), c.expected_content_type, "{}", c.description);

            let body = encoder.encode().unwrap();
            assert_eq!(body.len(), encoder.encoded_len(), "{}", c.description);

            let expected = c.expected_body_lines.join("\r\n");
            assert_eq!(
                String::from_utf8(body).unwrap(),
                expected,
                "{}",
                c.description
            );
        }
    }

    #[test]
    fn field_names_match_fixture_order() {
        let cases: Vec<ChunkCase> = load_fixture("upload_chunks.json");
        let names: Vec<String> = cases[0]
            .expected_body_lines
            .iter()
            .filter_map(|l| l.strip_prefix("Content-Disposition: form-data; name=\""))
            .map(|l| l.split('"').next().unwrap().to_string())
            .collect();
        let order: Vec<&str> = FormField::ORDER.iter().map(|f| f.as_str()).collect();
        assert_eq!(names, order);
    }
}
