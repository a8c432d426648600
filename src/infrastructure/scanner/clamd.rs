//! clamd client speaking the INSTREAM command over TCP

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, instrument, warn};

use crate::domain::{DomainError, ScanVerdict, VirusScanner};

const CHUNK_SIZE: usize = 64 * 1024;
const MAX_REPLY_BYTES: u64 = 4096;

/// Streams uploads to a clamd daemon
#[derive(Debug, Clone)]
pub struct ClamdScanner {
    address: String,
    timeout: Duration,
}

impl ClamdScanner {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn instream(&self, bytes: &[u8]) -> Result<String, std::io::Error> {
        let mut stream = TcpStream::connect(&self.address).await?;
        exchange(&mut stream, bytes).await
    }
}

/// Send one INSTREAM request and read the reply
async fn exchange<S>(stream: &mut S, bytes: &[u8]) -> Result<String, std::io::Error>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    stream.write_all(b"zINSTREAM\0").await?;

    for chunk in bytes.chunks(CHUNK_SIZE) {
        stream.write_all(&(chunk.len() as u32).to_be_bytes()).await?;
        stream.write_all(chunk).await?;
    }

    stream.write_all(&0u32.to_be_bytes()).await?;
    stream.flush().await?;

    let mut reply = Vec::new();
    stream.take(MAX_REPLY_BYTES).read_to_end(&mut reply).await?;

    Ok(String::from_utf8_lossy(&reply)
        .trim_end_matches(['\0', '\n'])
        .to_string())
}

/// Parse a clamd reply such as `stream: OK` or `stream: Eicar-Signature FOUND`
fn parse_reply(reply: &str) -> Result<ScanVerdict, DomainError> {
    let status = reply
        .split_once(": ")
        .map(|(_, status)| status)
        .unwrap_or(reply);

    if status == "OK" {
        return Ok(ScanVerdict::Clean);
    }

    if let Some(signature) = status.strip_suffix(" FOUND") {
        return Ok(ScanVerdict::Infected {
            signature: signature.to_string(),
        });
    }

    Err(DomainError::scan(format!("Unexpected clamd reply: {}", reply)))
}

#[async_trait]
impl VirusScanner for ClamdScanner {
    fn name(&self) -> &'static str {
        "clamd"
    }

    #[instrument(skip(self, bytes), fields(address = %self.address, size = bytes.len()))]
    async fn scan(&self, bytes: &[u8], filename: &str) -> Result<ScanVerdict, DomainError> {
        let reply = tokio::time::timeout(self.timeout, self.instream(bytes))
            .await
            .map_err(|_| DomainError::scan(format!("clamd timed out after {:?}", self.timeout)))?
            .map_err(|e| DomainError::scan(format!("clamd connection failed: {}", e)))?;

        let verdict = parse_reply(&reply)?;

        match &verdict {
            ScanVerdict::Clean => debug!("Upload is clean"),
            ScanVerdict::Infected { signature } => warn!(signature = %signature, "Upload is infected"),
        }

        Ok(verdict)
    }
}
