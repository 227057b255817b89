use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::domain::ParameterSet;
use crate::transport::canonical::{canonicalize, percent_encode};

type HmacSha1 = Hmac<Sha1>;

/// Name of the parameter carrying the computed signature.
pub const SIGNATURE_FIELD: &str = "Signature";

/// `percent_encode("/")`: RPC requests always sign the root path.
const ENCODED_ROOT_PATH: &str = "%2F";

/// `METHOD&%2F&percent_encode(canonical_query)`.
pub fn string_to_sign(http_method: &str, canonical_query: &str) -> String {
    format!(
        "{http_method}&{ENCODED_ROOT_PATH}&{}",
        percent_encode(canonical_query)
    )
}

/// Base64 HMAC-SHA1 of the string-to-sign, keyed by `secret&`.
pub fn sign(http_method: &str, canonical_query: &str, secret: &str) -> String {
    let message = string_to_sign(http_method, canonical_query);

    let mut mac = HmacSha1::new_from_slice(format!("{secret}&").as_bytes())
        .expect("hmac accepts keys of any length");
    mac.update(message.as_bytes());

    BASE64_STANDARD.encode(mac.finalize().into_bytes())
}

/// Canonicalize `params` and sign the result.
pub fn sign_params(http_method: &str, params: &ParameterSet, secret: &str) -> String {
    sign(http_method, &canonicalize(params), secret)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn params(pairs: &[(&str, &str)]) -> ParameterSet {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    fn send_sms_fixture() -> ParameterSet {
        params(&[
            ("AccessKeyId", "testid"),
            ("Action", "SendSms"),
            ("Timestamp", "2020-01-01T00:00:00Z"),
            ("Format", "json"),
            ("SignatureMethod", "HMAC-SHA1"),
            ("SignatureVersion", "1.0"),
            ("SignatureNonce", "abc123"),
            ("Version", "2017-05-25"),
            ("RegionId", "cn-hangzhou"),
            ("PhoneNumbers", "13800000000"),
            ("SignName", "TestSign"),
            ("TemplateCode", "SMS_001"),
        ])
    }

    #[test]
    fn string_to_sign_encodes_canonical_query() {
        assert_eq!(
            string_to_sign("POST", "Action=SendSms&Timestamp=2020-01-01T00%3A00%3A00Z"),
            "POST&%2F&Action%3DSendSms%26Timestamp%3D2020-01-01T00%253A00%253A00Z"
        );
    }

    #[test]
    fn send_sms_known_vector() {
        assert_eq!(
            sign_params("POST", &send_sms_fixture(), "testsecret"),
            "3XECrKNIMWa3AjJfZ2wMNXP0JYs="
        );
    }

    #[test]
    fn vendor_documentation_vector() {
        let params = params(&[
            ("AccessKeyId", "testId"),
            ("Action", "SendSms"),
            ("Format", "XML"),
            ("OutId", "123"),
            ("PhoneNumbers", "15300000001"),
            ("RegionId", "cn-hangzhou"),
            ("SignName", "阿里云短信测试专用"),
            ("SignatureMethod", "HMAC-SHA1"),
            ("SignatureNonce", "45e25e9b-0a6f-4070-8c85-2956eda1b466"),
            ("SignatureVersion", "1.0"),
            ("TemplateCode", "SMS_71390007"),
            ("TemplateParam", r#"{"customer":"test"}"#),
            ("Timestamp", "2017-07-12T02:42:19Z"),
            ("Version", "2017-05-25"),
        ]);

        assert_eq!(
            sign_params("GET", &params, "testSecret"),
            "zJDF+Lrzhj/ThnlvIToysFRq6t4="
        );
    }

    #[test]
    fn unicode_values_are_signed_over_utf8_bytes() {
        let params = params(&[
            ("TemplateParam", r#"{"code":"123"}"#),
            ("SignName", "阿里云 短信*~+"),
        ]);
        assert_eq!(
            sign_params("GET", &params, "testsecret"),
            "H73x9VI3J4EHngDnsApBlBhJrwA="
        );
    }

    #[test]
    fn signature_is_deterministic() {
        let query = canonicalize(&send_sms_fixture());
        assert_eq!(
            sign("POST", &query, "testsecret"),
            sign("POST", &query, "testsecret")
        );
    }

    #[test]
    fn any_single_input_change_changes_signature() {
        let query = canonicalize(&send_sms_fixture());
        let baseline = sign("POST", &query, "testsecret");

        let mut edited_query = query.clone();
        edited_query.replace_range(0..1, "B");

        assert_ne!(sign("GET", &query, "testsecret"), baseline);
        assert_ne!(sign("POST", &edited_query, "testsecret"), baseline);
        assert_ne!(sign("POST", &query, "testsecreT"), baseline);
    }
}
