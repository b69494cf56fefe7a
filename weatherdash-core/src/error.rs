use thiserror::Error;

/// Everything that can go wrong during one lookup.
///
/// Each variant renders as a single message suitable for showing to the user
/// as-is. None of them are retried.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Please enter a city name.")]
    EmptyInput,

    #[error("No coordinates found for \"{query}\". Please check the city name and try again.")]
    NotFound { query: String },

    #[error("Geolocation is not available on this device.")]
    GeolocationUnavailable,

    #[error("Location access was denied. Please search for a city manually.")]
    GeolocationDenied,

    #[error("Timed out while waiting for your location. Please search for a city manually.")]
    GeolocationTimeout,

    #[error("Network error. Please check your internet connection and try again.")]
    Network(#[source] reqwest::Error),

    #[error("Weather service error ({status}): {message}")]
    Provider { status: u16, message: String },

    #[error("Unexpected response from weather service: {0}")]
    Parse(String),

    #[error(
        "No API key configured.\n\
         Hint: run `weatherdash configure` and enter your OpenWeather API key."
    )]
    MissingApiKey,
}

impl WeatherError {
    /// True for the failures a caller can recover from by asking for a city name.
    pub fn is_geolocation(&self) -> bool {
        matches!(
            self,
            WeatherError::GeolocationUnavailable
                | WeatherError::GeolocationDenied
                | WeatherError::GeolocationTimeout
        )
    }
}

pub type Result<T, E = WeatherError> = std::result::Result<T, E>;
