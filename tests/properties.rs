use local_store::cache::derive_filename;
use local_store::path::{file_extension, file_name, file_name_without_extension, folder_name};
use local_store::serialize::{decode, decode_text, encode, encode_text};
use local_store::Persist;
use proptest::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Record {
    key: String,
    hits: u64,
    tags: Vec<String>,
    expires: Option<i64>,
}

impl Persist for Record {
    const TYPE_TAG: &'static str = "record";
}

fn record() -> impl Strategy<Value = Record> {
    (
        ".*",
        any::<u64>(),
        prop::collection::vec("[a-z]{0,8}", 0..5),
        any::<Option<i64>>(),
    )
        .prop_map(|(key, hits, tags, expires)| Record {
            key,
            hits,
            tags,
            expires,
        })
}

proptest! {
    #[test]
    fn test_derive_filename_is_deterministic(key in ".*", ext in "\\.[a-z]{0,4}") {
        let first = derive_filename(&key, &ext);
        prop_assert_eq!(&first, &derive_filename(&key, &ext));
        prop_assert!(first.ends_with(&ext));
    }

    #[test]
    fn test_blob_round_trip(value in record()) {
        let blob = encode(&value).unwrap();
        prop_assert_eq!(decode::<Record>(blob.as_bytes()).unwrap(), value.clone());

        let text = encode_text(&blob);
        let back = decode_text(&text).unwrap();
        prop_assert_eq!(decode::<Record>(back.as_bytes()).unwrap(), value);
    }

    #[cfg(unix)]
    #[test]
    fn test_path_parts_are_consistent(path in "(/?[a-z.]{0,6}){0,4}") {
        let name = file_name(&path);
        let stem = file_name_without_extension(&path);
        let ext = file_extension(&path);

        prop_assert!(name.starts_with(stem));
        if ext.is_empty() {
            prop_assert!(name == stem || name.ends_with('.'));
        } else {
            prop_assert_eq!(name, format!("{stem}.{ext}"));
        }
        if path.contains('/') {
            prop_assert_eq!(path.clone(), format!("{}/{}", folder_name(&path), name));
        } else {
            prop_assert_eq!(folder_name(&path), "");
        }
    }
}
