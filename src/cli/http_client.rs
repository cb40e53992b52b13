use std::time::Duration;

use reqwest::blocking::{Client, Response, multipart};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use super::credentials::Credentials;

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub error: Option<String>,
}

impl ApiClient {
    pub fn new(creds: &Credentials) -> anyhow::Result<Self> {
        let mut client = Self::anonymous(&creds.server_url)?;
        client.token = Some(creds.token.clone());
        Ok(client)
    }

    /// A client without a session, for register and login.
    pub fn anonymous(server_url: &str) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            base_url: server_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    fn authorized(
        &self,
        builder: reqwest::blocking::RequestBuilder,
    ) -> reqwest::blocking::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub fn get<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        let resp = self.authorized(self.client.get(self.url(path))).send()?;
        self.handle_response(resp)
    }

    pub fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> anyhow::Result<T> {
        let resp = self
            .authorized(self.client.post(self.url(path)))
            .json(body)
            .send()?;
        self.handle_response(resp)
    }

    /// POST without a body, for endpoints that answer 204.
    pub fn post_empty(&self, path: &str) -> anyhow::Result<()> {
        let resp = self.authorized(self.client.post(self.url(path))).send()?;
        self.check_status(resp).map(|_| ())
    }

    pub fn delete(&self, path: &str) -> anyhow::Result<()> {
        let resp = self.authorized(self.client.delete(self.url(path))).send()?;
        self.check_status(resp).map(|_| ())
    }

    pub fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        file_name: &str,
        data: Vec<u8>,
        title: &str,
    ) -> anyhow::Result<T> {
        let part = multipart::Part::bytes(data).file_name(file_name.to_string());
        let form = multipart::Form::new()
            .text("title", title.to_string())
            .part("file", part);

        let resp = self
            .authorized(self.client.post(self.url(path)))
            .multipart(form)
            .send()?;
        self.handle_response(resp)
    }

    /// Fetches a raw body, such as a document download.
    pub fn download(&self, path: &str) -> anyhow::Result<Vec<u8>> {
        let resp = self.authorized(self.client.get(self.url(path))).send()?;
        let resp = self.check_status(resp)?;
        Ok(resp.bytes()?.to_vec())
    }

    fn check_status(&self, resp: Response) -> anyhow::Result<Response> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            Err(error_from(resp))
        }
    }

    fn handle_response<T: DeserializeOwned>(&self, resp: Response) -> anyhow::Result<T> {
        let resp = self.check_status(resp)?;
        let api_resp: ApiResponse<T> = resp.json()?;
        api_resp
            .data
            .ok_or_else(|| anyhow::anyhow!("Server returned an empty response"))
    }
}

fn error_from(resp: Response) -> anyhow::Error {
    let status = resp.status();
    match resp.json::<ApiResponse<()>>() {
        Ok(api_resp) => anyhow::anyhow!(
            api_resp
                .error
                .unwrap_or_else(|| "Server error (no details provided)".into())
        ),
        Err(_) => anyhow::anyhow!("Server returned {status}"),
    }
}
