//! Header格式转换工具
//! 不同Header格式之间的转换

use std::collections::HashMap;
use reqwest::header::HeaderMap;

/// Header转换工具
pub struct HeaderConverter;

impl HeaderConverter {
    /// 将HeaderMap转换为HashMap<String, Vec<String>>（键折叠小写）
    pub fn to_hashmap(header_map: &HeaderMap) -> HashMap<String, Vec<String>> {
        let mut map = HashMap::new();

        for (key, value) in header_map.iter() {
            let key_str = key.as_str().to_lowercase();
            let value_str = value.to_str().unwrap_or("").to_string();

            map.entry(key_str)
                .or_insert_with(Vec::new)
                .push(value_str);
        }

        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderName, HeaderValue};

    #[test]
    fn test_to_hashmap_folds_keys_and_keeps_multi_values() {
        let mut headers = HeaderMap::new();
        headers.append(
            HeaderName::from_static("set-cookie"),
            HeaderValue::from_static("a=1"),
        );
        headers.append(
            HeaderName::from_static("set-cookie"),
            HeaderValue::from_static("b=2"),
        );

        let map = HeaderConverter::to_hashmap(&headers);
        assert_eq!(map["set-cookie"], vec!["a=1".to_string(), "b=2".to_string()]);
    }
}
