pub mod api;
pub mod check;
pub mod resources;
pub mod schema;

use cloudstack_client::Params;

/// `key=value` 形式の引数をパース
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("key=value 形式で指定してください: '{}'", s))?;
    if key.is_empty() {
        return Err(format!("キーが空です: '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}

pub(crate) fn to_params(pairs: Vec<(String, String)>) -> Params {
    pairs.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("zoneid=abc").unwrap(),
            ("zoneid".to_string(), "abc".to_string())
        );
        assert_eq!(
            parse_key_val("keyword=a=b").unwrap(),
            ("keyword".to_string(), "a=b".to_string())
        );
        assert_eq!(
            parse_key_val("listall=").unwrap(),
            ("listall".to_string(), String::new())
        );
        assert!(parse_key_val("zoneid").is_err());
        assert!(parse_key_val("=abc").is_err());
    }
}
