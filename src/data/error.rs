use std::path::PathBuf;

use thiserror::Error;

use super::loader::Source;

/// Everything that can go wrong while turning a source into a
/// [`SoilDataset`](super::model::SoilDataset).
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("could not fetch {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("download of {url} broke off: {source}")]
    Transfer {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV has no '{0}' column")]
    MissingColumn(&'static str),

    #[error("row {row}: DATE_TIME value '{value}' does not match YYYYMMDDHH")]
    Timestamp { row: usize, value: String },

    #[error("row {row}: SMANOM_5_CM value '{value}' is not a number")]
    Anomaly { row: usize, value: String },
}

impl DataLoadError {
    /// The CSV reader reports read failures as its own errors; pin those on
    /// the file or URL they came from so only format problems stay `Csv`.
    pub fn attributed_to(self, locator: &Source) -> Self {
        let io = match &self {
            DataLoadError::Csv(err) => match err.kind() {
                csv::ErrorKind::Io(io) => Some(std::io::Error::new(io.kind(), io.to_string())),
                _ => None,
            },
            _ => None,
        };
        let Some(source) = io else {
            return self;
        };

        match locator {
            Source::Path(path) => DataLoadError::Io {
                path: path.clone(),
                source,
            },
            Source::Url(url) => DataLoadError::Transfer {
                url: url.clone(),
                source,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::Path;

    fn csv_io_error() -> DataLoadError {
        DataLoadError::Csv(csv::Error::from(io::Error::new(
            io::ErrorKind::ConnectionReset,
            "peer reset",
        )))
    }

    #[test]
    fn read_failures_name_the_url() {
        let err = csv_io_error().attributed_to(&Source::from("https://example.com/soil.csv"));
        assert!(matches!(err, DataLoadError::Transfer { .. }));
        assert_eq!(
            err.to_string(),
            "download of https://example.com/soil.csv broke off: peer reset"
        );
    }

    #[test]
    fn read_failures_name_the_path() {
        let err = csv_io_error().attributed_to(&Source::from(Path::new("soil.csv").to_path_buf()));
        assert!(matches!(err, DataLoadError::Io { .. }));
    }

    #[test]
    fn other_errors_pass_through() {
        let err = DataLoadError::MissingColumn("DATE_TIME").attributed_to(&Source::from("x.csv"));
        assert!(matches!(err, DataLoadError::MissingColumn(_)));
    }
}
