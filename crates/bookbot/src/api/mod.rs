use std::time::Duration;

use serde::de::DeserializeOwned;

pub(crate) mod open_library;

use crate::{Error, ErrorKind};

/// How long a request may take before it is abandoned.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub trait Client {
    fn get_json<T>(&self, url: &str, query: &[(&str, String)]) -> Result<T, Error>
    where
        T: DeserializeOwned;
}

impl Client for reqwest::blocking::Client {
    fn get_json<T>(&self, url: &str, query: &[(&str, String)]) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        self.get(url)
            .query(query)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(|e| Error::wrap(ErrorKind::Network, e))
            .and_then(|r| r.json().map_err(|e| Error::wrap(ErrorKind::Deserialize, e)))
    }
}

/// Builds a blocking HTTP client whose requests give up after `timeout`.
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::blocking::Client, Error> {
    reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::wrap(ErrorKind::Network, e).with_message("Cannot build HTTP client"))
}

#[cfg(test)]
pub(crate) use test::{impl_json_producer, MockJsonClient, NetworkErrorProducer, Producer};

#[cfg(test)]
mod test {
    use super::*;

    pub(crate) trait Producer<T>
    where
        Self: Default,
    {
        fn produce() -> Result<T, Error>;
    }

    macro_rules! impl_json_producer {
        ($($producer:ident => $exp:expr,)*) => {
            $(
                #[derive(Default)]
                pub(crate) struct $producer;

                impl crate::api::Producer<String> for $producer {
                    fn produce() -> Result<String, crate::Error> {
                        $exp
                    }
                }
            )*
        };
    }
    impl_json_producer! {
        NetworkErrorProducer => Err(Error::new(ErrorKind::Network, "connection refused")),
    }

    pub(crate) use impl_json_producer;

    /// A [`Client`] answering every request with the JSON text from `P`.
    #[derive(Default)]
    pub(crate) struct MockJsonClient<P: Producer<String>>(std::marker::PhantomData<P>);

    impl<P: Producer<String>> Client for MockJsonClient<P> {
        fn get_json<T>(&self, _: &str, _: &[(&str, String)]) -> Result<T, Error>
        where
            T: serde::de::DeserializeOwned,
        {
            P::produce().and_then(|s| {
                serde_json::from_str(&s).map_err(|e| Error::wrap(ErrorKind::Deserialize, e))
            })
        }
    }
}
