use super::{EnvironmentContext, RecipeDescriptor};
use crate::config::LoaderSettings;
use crate::error::{Error, Result};
use reqwest::{redirect, Client};
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;
use url::{Host, Url};

const MAX_REDIRECTS: usize = 10;

/// Resolves the text of a recipe, either inline or by downloading it.
#[derive(Debug, Clone)]
pub struct RecipeLoader {
    client: Client,
    trusted_host: Option<Host<String>>,
    max_recipe_size: u64,
    temp_dir: Option<PathBuf>,
}

impl RecipeLoader {
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the settings are invalid or the HTTP
    /// client cannot be built.
    pub fn new(settings: &LoaderSettings) -> Result<Self> {
        settings.validate()?;

        let trusted_host = settings.trusted_host();

        // A tokenized URL must not reach another host, neither as the
        // redirect target nor through the Referer header.
        let client = Client::builder()
            .timeout(settings.fetch_timeout()?)
            .referer(false)
            .redirect(redirect_policy(trusted_host.clone()))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            trusted_host,
            max_recipe_size: settings.max_recipe_size,
            temp_dir: None,
        })
    }

    /// Download into `dir` instead of the system temporary directory.
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Get the raw text of a recipe.
    ///
    /// Inline content is returned as is. Otherwise the recipe is downloaded
    /// from its location, see [`RecipeLoader::fetch`].
    pub async fn load(&self, descriptor: &RecipeDescriptor) -> Result<String> {
        if let Some(ref content) = descriptor.content {
            return Ok(content.clone());
        }

        match descriptor.location.as_deref() {
            Some(location) => self.fetch(location).await,
            None => Err(Error::MissingRecipeSource),
        }
    }

    /// Download a recipe.
    ///
    /// The current subject's token is attached when the location is on the
    /// trusted API host. The body is written to a temporary file which is
    /// removed again whether or not reading it succeeded. Dropping the
    /// returned future also removes the file.
    pub async fn fetch(&self, location: &str) -> Result<String> {
        let token = EnvironmentContext::current_token();
        let url = self
            .authorize_location(location, token.as_deref())
            .map_err(|reason| fetch_error(location, reason))?;

        tracing::info!("Downloading recipe from {}", location);

        let mut builder = tempfile::Builder::new();
        builder.prefix("recipe");
        let file = match self.temp_dir {
            Some(ref dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(|e| fetch_error(location, e))?;

        let writer = file
            .as_file()
            .try_clone()
            .map(tokio::fs::File::from_std)
            .map_err(|e| fetch_error(location, e))?;

        let result = match self.download(url, writer).await {
            Ok(bytes) => {
                tracing::debug!("Downloaded {} bytes of recipe {}", bytes, location);
                tokio::fs::read_to_string(file.path())
                    .await
                    .map_err(|e| e.to_string())
            }
            Err(reason) => Err(reason),
        };

        let path = file.path().to_path_buf();
        if let Err(e) = file.close() {
            tracing::error!("Removal of recipe file {} failed: {}", path.display(), e);
        }

        result.map_err(|reason| fetch_error(location, reason))
    }

    /// Parse `location` and attach `token` as a query parameter if the
    /// location's host is exactly the trusted API host.
    ///
    /// Hosts are compared as parsed hosts, so `api.example.com.evil.io` or
    /// `evil-api.example.com` never match `api.example.com`.
    pub fn authorize_location(
        &self,
        location: &str,
        token: Option<&str>,
    ) -> std::result::Result<Url, String> {
        let mut url = Url::parse(location).map_err(|e| format!("invalid URL: {}", e))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(format!(
                "scheme must be http or https, got '{}'",
                url.scheme()
            ));
        }

        if let (true, Some(token)) = (is_trusted(self.trusted_host.as_ref(), &url), token) {
            url.query_pairs_mut().append_pair("token", token);
        }

        Ok(url)
    }

    async fn download(
        &self,
        url: Url,
        mut file: tokio::fs::File,
    ) -> std::result::Result<u64, String> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(describe_http_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("server responded with {}", status));
        }

        if let Some(length) = response.content_length() {
            if length > self.max_recipe_size {
                return Err(self.too_large());
            }
        }

        let mut total: u64 = 0;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(describe_http_error)?
        {
            total += chunk.len() as u64;
            if total > self.max_recipe_size {
                return Err(self.too_large());
            }
            file.write_all(&chunk).await.map_err(|e| e.to_string())?;
        }
        file.flush().await.map_err(|e| e.to_string())?;

        Ok(total)
    }

    fn too_large(&self) -> String {
        format!("recipe exceeds {} bytes", self.max_recipe_size)
    }
}

fn is_trusted(trusted: Option<&Host<String>>, url: &Url) -> bool {
    match (trusted, url.host()) {
        (Some(trusted), Some(host)) => host.to_owned() == *trusted,
        _ => false,
    }
}

/// Follow redirects, except from the trusted host to any other host.
fn redirect_policy(trusted_host: Option<Host<String>>) -> redirect::Policy {
    redirect::Policy::custom(move |attempt| {
        if attempt.previous().len() > MAX_REDIRECTS {
            return attempt.error(format!("more than {} redirects", MAX_REDIRECTS));
        }

        let from_trusted = attempt
            .previous()
            .iter()
            .any(|url| is_trusted(trusted_host.as_ref(), url));
        if from_trusted && !is_trusted(trusted_host.as_ref(), attempt.url()) {
            let target = attempt.url().host_str().unwrap_or_default().to_string();
            return attempt.error(format!(
                "refusing redirect from the API host to '{}'",
                target
            ));
        }

        attempt.follow()
    })
}

/// Error text without the request URL, which may carry the token. The
/// source is included since redirect refusals only show up there.
fn describe_http_error(e: reqwest::Error) -> String {
    let e = e.without_url();
    match std::error::Error::source(&e) {
        Some(source) => format!("{}: {}", e, source),
        None => e.to_string(),
    }
}

fn fetch_error(location: &str, reason: impl ToString) -> Error {
    Error::RecipeFetch {
        location: location.to_string(),
        reason: reason.to_string(),
    }
}
