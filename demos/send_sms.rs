use std::io;

use dysms::{DysmsClient, SendSms};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let phone = std::env::var("DYSMS_PHONE").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "DYSMS_PHONE environment variable is required",
        )
    })?;
    let sign_name = std::env::var("DYSMS_SIGN_NAME").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "DYSMS_SIGN_NAME environment variable is required",
        )
    })?;
    let template_code = std::env::var("DYSMS_TEMPLATE_CODE").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "DYSMS_TEMPLATE_CODE environment variable is required",
        )
    })?;
    let code = std::env::var("DYSMS_CODE").unwrap_or_else(|_| "123456".to_owned());

    // Credentials come from ALIBABA_CLOUD_ACCESS_KEY_ID / ALIBABA_CLOUD_ACCESS_KEY_SECRET.
    let client = DysmsClient::from_env()?;
    let request = SendSms::new()
        .phone_numbers(phone.split(','))
        .sign_name(sign_name)
        .template_code(template_code)
        .template_param(&serde_json::json!({ "code": code }))?;

    let response = client.send_sms(&request).await?;
    println!(
        "code: {}, message: {:?}, biz_id: {:?}, request_id: {:?}",
        response.code, response.message, response.biz_id, response.request_id
    );

    Ok(())
}
