use std::path::Path;

use serde::de::DeserializeOwned;

use slimline::error::{Chainable, Result};
use slimline::host::{Request, Site};

/// The host data for one request, read from disk.
#[derive(Debug)]
pub struct Fixture {
    pub site: Site,
    pub request: Request,
}

impl Fixture {
    pub fn load(site: &Path, request: &Path) -> Result<Self> {
        Ok(Fixture { site: read(site)?, request: read(request)? })
    }
}

/// Deserializes `path` as JSON when its extension says so, otherwise as TOML.
pub fn read<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let string = std::fs::read_to_string(path).chain_with(|| slimline::error! {
        "failed to read fixture",
        "path" => path.display(),
    })?;

    let value: Result<T> = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&string).map_err(Into::into),
        _ => toml::from_str(&string).map_err(Into::into),
    };

    value.chain_with(|| slimline::error! {
        "malformed fixture",
        "path" => path.display(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use slimline::host::Queried;

    #[test]
    fn reads_toml_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let site = dir.path().join("site.toml");
        std::fs::write(&site, r#"
            name = "Acme"
            tagline = "Things"

            [[posts]]
            id = 3
            title = "About"
            post_type = "page"
        "#).unwrap();

        let request = dir.path().join("request.json");
        std::fs::write(&request, r#"{
            "is": { "singular": true, "page": true },
            "queried": { "type": "post", "id": 3 }
        }"#).unwrap();

        let fixture = Fixture::load(&site, &request).unwrap();
        assert_eq!(fixture.site.post(3).unwrap().title, "About");
        assert!(fixture.request.conditions.page);
        assert_eq!(fixture.request.queried, Queried::Post { id: 3 });
    }

    #[test]
    fn malformed_fixtures_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.toml");
        std::fs::write(&path, "name = ").unwrap();

        let error = read::<Site>(&path).unwrap_err();
        assert_eq!(error.message(), "malformed fixture");
        assert_eq!(error.param("path").as_deref(), Some(&*path.display().to_string()));
        assert!(read::<Site>(&dir.path().join("missing.toml")).is_err());
    }
}
