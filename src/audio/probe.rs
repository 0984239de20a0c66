use std::path::Path;
use std::time::Duration;

use lofty::file::AudioFile;

use super::error::TransportError;

/// Resolves how long a file plays for.
pub trait MediaProbe {
    fn duration(&self, path: &Path) -> Result<Duration, TransportError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyProbe;

impl MediaProbe for LoftyProbe {
    fn duration(&self, path: &Path) -> Result<Duration, TransportError> {
        let tagged = lofty::read_from_path(path).map_err(|e| TransportError::unreadable(path, e))?;
        let duration = tagged.properties().duration();
        if duration.is_zero() {
            return Err(TransportError::unreadable(path, "no duration in stream properties"));
        }
        Ok(duration)
    }
}
