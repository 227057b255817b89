use std::io;

use dysms::{CustomRequest, DysmsClient, KeyCase};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let phone = std::env::var("DYSMS_PHONE").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "DYSMS_PHONE environment variable is required",
        )
    })?;
    let send_date = std::env::var("DYSMS_SEND_DATE")
        .unwrap_or_else(|_| chrono::Utc::now().format("%Y%m%d").to_string());

    let client = DysmsClient::builder()
        .load_from_env()
        .response_key_case(KeyCase::Lower)
        .build()?;
    let request = CustomRequest::new("QuerySendDetails")?
        .param("PhoneNumber", phone)
        .param("SendDate", send_date)
        .param("PageSize", "10")
        .param("CurrentPage", "1");

    let body = client.execute(&request).await?;
    println!("{}", serde_json::to_string_pretty(&body)?);

    Ok(())
}
