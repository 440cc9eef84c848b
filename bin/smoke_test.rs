/**
 * Smoke test against a running blivechat server
 * Exercises the discovery endpoints, emoticon upload/list and SPA fallback
 */

use reqwest::{multipart, StatusCode};
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let base_url = std::env::var("TEST_URL").unwrap_or_else(|_| "http://localhost:12450".to_string());

    println!("Testing blivechat with base URL: {}", base_url);
    println!("{}", "=".repeat(80));

    let client = reqwest::Client::new();

    test_discovery(&client, &base_url).await?;
    test_emoticon_upload(&client, &base_url).await?;
    test_emoticon_list(&client, &base_url).await?;
    test_spa_fallback(&client, &base_url).await?;

    println!("\n{}", "=".repeat(80));
    println!("All smoke tests passed");
    Ok(())
}

async fn test_discovery(client: &reqwest::Client, base_url: &str) -> Result<(), Box<dyn Error>> {
    println!("\nTEST: discovery endpoints");

    let ping = client.get(format!("{}/api/ping", base_url)).send().await?;
    if ping.status() != StatusCode::NO_CONTENT {
        return Err(format!("ping returned {}", ping.status()).into());
    }
    println!("   ping ok");

    let info: serde_json::Value = client
        .get(format!("{}/api/server_info", base_url))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    println!("   server version {}", info["version"]);
    println!("   config {}", info["config"]);

    let endpoints: serde_json::Value = client
        .get(format!("{}/api/endpoints", base_url))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    println!("   endpoints {}", endpoints["endpoints"]);

    Ok(())
}

async fn test_emoticon_upload(client: &reqwest::Client, base_url: &str) -> Result<(), Box<dyn Error>> {
    println!("\nTEST: emoticon upload");

    // (bytes, mime, expected status, description)
    let test_cases: Vec<(Vec<u8>, &str, StatusCode, &str)> = vec![
        (b"\x89PNG\r\n\x1a\nsmoke".to_vec(), "image/png", StatusCode::OK, "small PNG"),
        (b"plain text".to_vec(), "text/plain", StatusCode::UNSUPPORTED_MEDIA_TYPE, "text file"),
        (vec![0u8; 1024 * 1024 + 1], "image/png", StatusCode::PAYLOAD_TOO_LARGE, "1 MiB + 1 byte"),
    ];

    for (data, mime_type, expected, description) in test_cases {
        println!("\n  Case: {}", description);

        let form = multipart::Form::new().part(
            "file",
            multipart::Part::bytes(data.clone())
                .file_name("emoticon.png")
                .mime_str(mime_type)?,
        );

        let response = client
            .post(format!("{}/api/emoticon", base_url))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::FORBIDDEN {
            println!("     uploads are disabled on this server, skipping");
            return Ok(());
        }
        if status != expected {
            return Err(format!("expected {}, got {}: {}", expected, status, response.text().await?).into());
        }
        println!("     status {} as expected", status);

        if status.is_success() {
            let body: serde_json::Value = response.json().await?;
            let url = body["url"].as_str().ok_or("Missing url in response")?;
            println!("     stored at {}", url);

            let stored = client
                .get(format!("{}{}", base_url, url))
                .send()
                .await?
                .error_for_status()?
                .bytes()
                .await?;
            if stored.as_ref() != data.as_slice() {
                return Err("stored emoticon differs from upload".into());
            }
            println!("     download matches upload");
        }
    }

    Ok(())
}

async fn test_emoticon_list(client: &reqwest::Client, base_url: &str) -> Result<(), Box<dyn Error>> {
    println!("\nTEST: emoticon list");

    let response = client.get(format!("{}/api/emoticons", base_url)).send().await?;
    match response.status() {
        StatusCode::NOT_FOUND => println!("   no emoticons.csv configured"),
        status if status.is_success() => {
            let list: Vec<serde_json::Value> = response.json().await?;
            println!("   {} emoticon(s)", list.len());
        }
        status => return Err(format!("emoticon list returned {}", status).into()),
    }

    Ok(())
}

async fn test_spa_fallback(client: &reqwest::Client, base_url: &str) -> Result<(), Box<dyn Error>> {
    println!("\nTEST: SPA fallback");

    let response = client
        .get(format!("{}/room/smoke-test-does-not-exist", base_url))
        .send()
        .await?;
    let cache_control = response
        .headers()
        .get("cache-control")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("not set")
        .to_string();

    println!("   status {}, Cache-Control: {}", response.status(), cache_control);
    if response.status().is_success() && cache_control != "no-cache" {
        return Err("index served without no-cache".into());
    }

    Ok(())
}
