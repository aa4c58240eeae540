//! Blocking HTTP access for release lookups and artifact downloads.

use std::fs::File;
use std::path::Path;

use reqwest::blocking::Client;

use super::progress::{create_spinner, finish_spinner_with_success};
use crate::error::{ProvisionError, Result};

pub trait HttpClient {
    /// GET `url` and return the body, failing on non-2xx status.
    fn get_text(&self, url: &str) -> Result<String>;

    /// GET `url`, follow redirects, and return the final location.
    fn final_url(&self, url: &str) -> Result<String>;

    /// Stream `url` into `dest`.
    fn download(&self, url: &str, dest: &Path) -> Result<()>;
}

pub struct ReqwestClient {
    client: Client,
}

impl ReqwestClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(format!("provision/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProvisionError::network("client", e))?;
        Ok(Self { client })
    }

    fn send(&self, url: &str) -> Result<reqwest::blocking::Response> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json, */*")
            .send()
            .map_err(|e| ProvisionError::network(url, e))?;

        if !response.status().is_success() {
            return Err(ProvisionError::network(
                url,
                format!("server returned status {}", response.status()),
            ));
        }
        Ok(response)
    }
}

impl HttpClient for ReqwestClient {
    fn get_text(&self, url: &str) -> Result<String> {
        self.send(url)?
            .text()
            .map_err(|e| ProvisionError::network(url, e))
    }

    fn final_url(&self, url: &str) -> Result<String> {
        let response = self.send(url)?;
        Ok(response.url().to_string())
    }

    fn download(&self, url: &str, dest: &Path) -> Result<()> {
        let spinner = create_spinner(format!("Downloading {url}"));
        let mut response = self.send(url)?;
        let mut file = File::create(dest)?;
        response
            .copy_to(&mut file)
            .map_err(|e| ProvisionError::network(url, e))?;
        finish_spinner_with_success(spinner, format!("Downloaded {}", dest.display()));
        Ok(())
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Canned responses keyed by URL. Unknown URLs fail like an unreachable host.
    #[derive(Default)]
    pub struct FakeHttp {
        pub bodies: HashMap<String, String>,
        pub redirects: HashMap<String, String>,
        pub files: HashMap<String, Vec<u8>>,
        pub downloads: RefCell<Vec<String>>,
    }

    impl FakeHttp {
        pub fn body(mut self, url: &str, body: &str) -> Self {
            self.bodies.insert(url.to_string(), body.to_string());
            self
        }

        pub fn redirect(mut self, url: &str, target: &str) -> Self {
            self.redirects.insert(url.to_string(), target.to_string());
            self
        }

        pub fn file(mut self, url: &str, bytes: &[u8]) -> Self {
            self.files.insert(url.to_string(), bytes.to_vec());
            self
        }

        pub fn download_count(&self) -> usize {
            self.downloads.borrow().len()
        }
    }

    impl HttpClient for FakeHttp {
        fn get_text(&self, url: &str) -> Result<String> {
            self.bodies
                .get(url)
                .cloned()
                .ok_or_else(|| ProvisionError::network(url, "connection refused"))
        }

        fn final_url(&self, url: &str) -> Result<String> {
            self.redirects
                .get(url)
                .cloned()
                .ok_or_else(|| ProvisionError::network(url, "connection refused"))
        }

        fn download(&self, url: &str, dest: &Path) -> Result<()> {
            self.downloads.borrow_mut().push(url.to_string());
            let bytes = self
                .files
                .get(url)
                .ok_or_else(|| ProvisionError::network(url, "connection reset"))?;
            std::fs::write(dest, bytes)?;
            Ok(())
        }
    }
}
