//! Record file loader.

use std::path::Path;

use behavior_tree::Record;

use crate::loaders::{LoadResult, read_file};

/// On-disk encodings a record file may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Ron,
    Json,
}

impl RecordFormat {
    /// File extensions probed, in order, when resolving a source id.
    pub const EXTENSIONS: [&'static str; 2] = ["ron", "json"];

    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "ron" => Some(Self::Ron),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Loader for tag/attribute/children records.
pub struct RecordLoader;

impl RecordLoader {
    /// Load a record, picking the format from the file extension.
    pub fn load(path: &Path) -> LoadResult<Record> {
        let format = RecordFormat::from_path(path).ok_or_else(|| {
            anyhow::anyhow!("Unsupported record file {}: expected .ron or .json", path.display())
        })?;
        let content = read_file(path)?;
        Self::parse(&content, format)
            .map_err(|e| anyhow::anyhow!("Failed to parse record {}: {}", path.display(), e))
    }

    pub fn parse(content: &str, format: RecordFormat) -> LoadResult<Record> {
        let record: Record = match format {
            RecordFormat::Ron => ron::from_str(content)?,
            RecordFormat::Json => serde_json::from_str(content)?,
        };
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use behavior_tree::Value;

    use super::*;

    #[test]
    fn ron_and_json_agree() {
        let ron = r#"(tag: "Sequence", attributes: {"Name": "root", "Count": 2, "Rate": 0.5}, children: [
            (tag: "Action", attributes: {"Name": "idle", "Shared": true}),
        ])"#;
        let json = r#"{"tag": "Sequence", "attributes": {"Name": "root", "Count": 2, "Rate": 0.5},
            "children": [{"tag": "Action", "attributes": {"Name": "idle", "Shared": true}}]}"#;

        let from_ron = RecordLoader::parse(ron, RecordFormat::Ron).expect("ron");
        let from_json = RecordLoader::parse(json, RecordFormat::Json).expect("json");

        assert_eq!(from_ron, from_json);
        assert_eq!(from_ron.attributes.get("Count"), Some(&Value::Int(2)));
        assert_eq!(from_ron.attributes.get("Rate"), Some(&Value::Float(0.5)));
        assert!(from_ron.children[0].attr_bool_or("Shared", false));
    }

    #[test]
    fn attributes_and_children_are_optional() {
        let record = RecordLoader::parse(r#"(tag: "Action")"#, RecordFormat::Ron).expect("ron");
        assert_eq!(record, Record::new("Action"));
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            RecordFormat::from_path(Path::new("trees/guard.ron")),
            Some(RecordFormat::Ron)
        );
        assert_eq!(
            RecordFormat::from_path(Path::new("keys.json")),
            Some(RecordFormat::Json)
        );
        assert_eq!(RecordFormat::from_path(Path::new("keys.xml")), None);
    }
}
