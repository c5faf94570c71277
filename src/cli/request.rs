// ABOUTME: CLI request command
//
// Sends a single HTTP request and prints status, headers and body (text/JSON output)

use anyhow::{anyhow, Result};
use serde::Serialize;
use std::time::Duration;

use super::{OutputFormat, RequestArgs};
use crate::http::{parse_method, HttpRequester, RequestOptions};

/// JSON output structure for request command
#[derive(Debug, Serialize)]
pub struct RequestOutput {
    pub url: String,
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Split `Name: value` into its parts
pub fn parse_header(raw: &str) -> Result<(String, String)> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| anyhow!("Invalid header '{}', expected 'Name: value'", raw))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(anyhow!("Invalid header '{}', name is empty", raw));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

pub async fn execute(args: RequestArgs, format: OutputFormat) -> Result<()> {
    let method = parse_method(&args.method)?;
    let headers = args
        .headers
        .iter()
        .map(|h| parse_header(h))
        .collect::<Result<Vec<_>>>()?;

    let (requester, _events) = HttpRequester::from_url(args.url, method);
    let response = requester
        .send(
            None,
            None,
            RequestOptions {
                headers,
                body: args.data,
                timeout: Some(Duration::from_secs(args.timeout)),
                ..RequestOptions::default()
            },
        )
        .await?;

    match format {
        OutputFormat::Json => {
            let output = RequestOutput {
                url: response.url,
                status: response.status,
                headers: response.headers,
                body: response.body,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            println!("HTTP {} {}", response.status, response.url);
            for (name, value) in &response.headers {
                println!("{}: {}", name, value);
            }
            println!();
            println!("{}", response.body);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header() {
        assert_eq!(
            parse_header("Accept: text/plain").unwrap(),
            ("Accept".to_string(), "text/plain".to_string())
        );
        assert_eq!(
            parse_header("X-Token:abc:def").unwrap(),
            ("X-Token".to_string(), "abc:def".to_string())
        );
    }

    #[test]
    fn test_parse_header_rejects_malformed() {
        assert!(parse_header("no-colon").is_err());
        assert!(parse_header(": value").is_err());
    }
}
