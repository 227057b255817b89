use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::domain::ParameterSet;

/// RFC 3986 encode set: everything except `A-Z a-z 0-9 - _ . ~` is escaped.
///
/// Space becomes `%20` (never `+`) and `*` becomes `%2A`.
pub static RPC_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode `input` the way the RPC signature expects.
pub fn percent_encode(input: &str) -> String {
    utf8_percent_encode(input, &RPC_ENCODE_SET).to_string()
}

/// Build the canonical query string: `k=v` pairs, byte-wise sorted by key, joined by `&`.
pub fn canonicalize(params: &ParameterSet) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", percent_encode(key), percent_encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use percent_encoding::percent_decode_str;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;

    #[test_case("abcXYZ019", "abcXYZ019"; "alphanumerics")]
    #[test_case("-_.~", "-_.~"; "unreserved marks")]
    #[test_case("a b", "a%20b"; "space")]
    #[test_case("a+b", "a%2Bb"; "plus")]
    #[test_case("*", "%2A"; "asterisk")]
    #[test_case("/", "%2F"; "slash")]
    #[test_case("2020-01-01T00:00:00Z", "2020-01-01T00%3A00%3A00Z"; "timestamp")]
    #[test_case(r#"{"code":"123"}"#, "%7B%22code%22%3A%22123%22%7D"; "json")]
    #[test_case("é", "%C3%A9"; "multibyte utf8")]
    fn percent_encode_cases(input: &str, expected: &str) {
        assert_eq!(percent_encode(input), expected);
    }

    #[test]
    fn canonicalize_empty_set_is_empty_string() {
        assert_eq!(canonicalize(&ParameterSet::new()), "");
    }

    #[test]
    fn canonicalize_sorts_and_encodes_keys_and_values() {
        let params = ParameterSet::from([
            ("b".to_owned(), "2 2".to_owned()),
            ("A".to_owned(), "*".to_owned()),
            ("a".to_owned(), "~".to_owned()),
        ]);
        assert_eq!(canonicalize(&params), "A=%2A&a=~&b=2%202");
    }

    #[test]
    fn canonicalize_is_independent_of_insertion_order() {
        let pairs = [("Format", "json"), ("Action", "SendSms"), ("Version", "2017-05-25")];

        let forward = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect::<ParameterSet>();
        let reverse = pairs
            .iter()
            .rev()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect::<ParameterSet>();

        assert_eq!(canonicalize(&forward), canonicalize(&reverse));
        assert_eq!(
            canonicalize(&forward),
            "Action=SendSms&Format=json&Version=2017-05-25"
        );
    }

    #[test]
    fn canonical_query_decodes_back_to_original_pairs() {
        let params = ParameterSet::from([
            ("SignName".to_owned(), "阿里云 短信*~+".to_owned()),
            ("TemplateParam".to_owned(), r#"{"code":"a=b&c"}"#.to_owned()),
            ("Odd Key/".to_owned(), "%7E".to_owned()),
        ]);

        let decoded = canonicalize(&params)
            .split('&')
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap();
                (
                    percent_decode_str(key).decode_utf8().unwrap().into_owned(),
                    percent_decode_str(value).decode_utf8().unwrap().into_owned(),
                )
            })
            .collect::<ParameterSet>();

        assert_eq!(decoded, params);
    }
}
