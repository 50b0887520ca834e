use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use url::Url;

use super::envelope::{
    GET_CERTIFICATE_ACTION, get_certificate_request, parse_get_certificate_response,
};
use super::{CertificateFetcher, FetchOutcome, ScmdError};

const SOAP_ACTION_HEADER: &str = "SOAPAction";

/// SOAP client for the CMD signature service.
#[derive(Debug, Clone)]
pub struct ScmdClient {
    client: Client,
    endpoint: Url,
}

impl ScmdClient {
    pub fn new(client: Client, endpoint: Url) -> Self {
        ScmdClient { client, endpoint }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl CertificateFetcher for ScmdClient {
    async fn get_certificate(
        &self,
        application_id: &[u8],
        user_id: &str,
    ) -> Result<FetchOutcome, ScmdError> {
        let body = get_certificate_request(application_id, user_id);
        log::debug!("POST {} GetCertificate", self.endpoint);
        log::debug!("{}", body);

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static("text/xml; charset=utf-8"))
            .header(SOAP_ACTION_HEADER, format!("\"{GET_CERTIFICATE_ACTION}\""))
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        log::debug!("HTTP {}", status);
        log::debug!("{}", text);

        match parse_get_certificate_response(&text) {
            Err(ScmdError::Fault(fault)) => Err(ScmdError::Fault(fault)),
            _ if !status.is_success() => Err(ScmdError::Status(status)),
            outcome => outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::report;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    const CHAIN: &str = include_str!("../../testdata/chain.pem");

    /// Answer a single HTTP request with `status` and `body`, returning the raw request.
    async fn serve_once(status: &'static str, body: String) -> (Url, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request.ends_with(b"</soapenv:Envelope>") {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: text/xml; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&request).into_owned()
        });

        let url = Url::parse(&format!(
            "http://{addr}/Ama.Authentication.Frontend/CCMovelDigitalSignature.svc"
        ))
        .unwrap();
        (url, handle)
    }

    fn local_client() -> Client {
        Client::builder().no_proxy().build().unwrap()
    }

    fn soap_result(inner: &str) -> String {
        format!(
            r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"><s:Body><GetCertificateResponse xmlns="http://Ama.Authentication.Service/">{inner}</GetCertificateResponse></s:Body></s:Envelope>"#
        )
    }

    #[tokio::test]
    async fn test_get_certificate() {
        let (url, server) = serve_once(
            "200 OK",
            soap_result(&format!("<GetCertificateResult>{CHAIN}</GetCertificateResult>")),
        )
        .await;
        let client = ScmdClient::new(local_client(), url);

        let outcome = client
            .get_certificate(b"app-id", "+351 912345678")
            .await
            .expect("certificate");
        assert_eq!(outcome, FetchOutcome::Certificate(CHAIN.trim().to_string()));

        let request = server.await.unwrap();
        let lowercase = request.to_ascii_lowercase();
        assert!(
            request.starts_with("POST /Ama.Authentication.Frontend/CCMovelDigitalSignature.svc")
        );
        assert!(lowercase.contains(
            "soapaction: \"http://ama.authentication.service/ccmovelsignature/getcertificate\""
        ));
        assert!(lowercase.contains("content-type: text/xml; charset=utf-8"));
        assert!(request.contains("<ama:applicationId>YXBwLWlk</ama:applicationId>"));
        assert!(request.contains("<ama:userId>+351 912345678</ama:userId>"));
    }

    #[tokio::test]
    async fn test_empty_result() {
        let (url, server) = serve_once("200 OK", soap_result("<GetCertificateResult/>")).await;
        let client = ScmdClient::new(local_client(), url);

        let outcome = client.get_certificate(b"app-id", "+351 000000000").await.unwrap();
        assert_eq!(outcome, FetchOutcome::Empty);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_fault_on_server_error() {
        let fault = r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"><s:Body><s:Fault><faultcode>s:Client</faultcode><faultstring>Invalid user</faultstring></s:Fault></s:Body></s:Envelope>"#;
        let (url, server) = serve_once("500 Internal Server Error", fault.to_string()).await;
        let client = ScmdClient::new(local_client(), url);

        let err = client.get_certificate(b"app-id", "+351 000000000").await.unwrap_err();
        assert!(matches!(err, ScmdError::Fault(ref m) if m == "Invalid user"));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_http_error_without_fault() {
        let (url, server) = serve_once("404 Not Found", "<html>not here</html>".to_string()).await;
        let client = ScmdClient::new(local_client(), url);

        let err = client.get_certificate(b"app-id", "+351 000000000").await.unwrap_err();
        assert!(matches!(err, ScmdError::Status(s) if s.as_u16() == 404));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = Url::parse(&format!("http://{addr}/svc")).unwrap();
        let client = ScmdClient::new(local_client(), url);

        let err = client.get_certificate(b"app-id", "+351 000000000").await.unwrap_err();
        assert!(matches!(err, ScmdError::Transport(_)));
        assert!(report(&err).to_lowercase().contains("connection refused"));
    }
}
