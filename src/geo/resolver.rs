//! MaxMind-backed IP resolution.

use std::net::IpAddr;
use std::path::{Path, PathBuf};

use maxminddb::geoip2;
use thiserror::Error;

/// Database file looked up when the configured path is a directory.
const DEFAULT_DB_FILE: &str = "GeoLite2-City.mmdb";

/// Errors that can occur opening the geo database.
#[derive(Debug, Error)]
pub enum GeoError {
    #[error("failed to open geo database at {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: maxminddb::MaxMindDBError,
    },
}

/// Owned lookup result.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    /// ISO country code, e.g. "DE".
    pub country: Option<String>,
    /// English city name.
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// IP-to-location resolver over a MaxMind GeoIP2 database.
#[derive(Debug)]
pub struct Resolver {
    reader: maxminddb::Reader<Vec<u8>>,
}

impl Resolver {
    /// Open the database at `path`.
    ///
    /// A directory path is resolved to the bundled `GeoLite2-City.mmdb`.
    pub fn open(path: &Path) -> Result<Self, GeoError> {
        let db_path = if path.is_dir() {
            path.join(DEFAULT_DB_FILE)
        } else {
            path.to_path_buf()
        };

        let reader = maxminddb::Reader::open_readfile(&db_path).map_err(|source| GeoError::Open {
            path: db_path,
            source,
        })?;
        Ok(Self { reader })
    }

    /// Resolve an address to a location, if the database knows it.
    pub fn resolve(&self, ip: IpAddr) -> Option<Location> {
        let city: geoip2::City<'_> = self.reader.lookup(ip).ok()?;
        let location = city.location;
        Some(Location {
            country: city
                .country
                .and_then(|c| c.iso_code)
                .map(str::to_string),
            city: city
                .city
                .and_then(|c| c.names)
                .and_then(|names| names.get("en").map(|name| (*name).to_string())),
            latitude: location.as_ref().and_then(|l| l.latitude),
            longitude: location.as_ref().and_then(|l| l.longitude),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_file_fails() {
        let err = Resolver::open(Path::new("/nonexistent/GeoLite2-City.mmdb")).unwrap_err();
        let GeoError::Open { path, .. } = err;
        assert_eq!(path, PathBuf::from("/nonexistent/GeoLite2-City.mmdb"));
    }

    #[test]
    fn test_directory_path_resolves_to_default_db_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Resolver::open(dir.path()).unwrap_err();
        let GeoError::Open { path, .. } = err;
        assert_eq!(path, dir.path().join(DEFAULT_DB_FILE));
    }

    #[test]
    fn test_garbage_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bogus.mmdb");
        std::fs::write(&path, b"not a maxmind database").unwrap();
        assert!(Resolver::open(&path).is_err());
    }
}
