use std::time::Duration;

use ureq::{Agent, AgentBuilder, Error};

use super::{Fetcher, Response};
use crate::config::DEFAULT_USER_AGENT;

pub struct UReqFetcher {
    agent: Agent,
}

impl Fetcher for UReqFetcher {
    fn fetch(&self, url: &str, timeout: Duration) -> Response {
        let response = self.agent.get(url).timeout(timeout).call();

        match response {
            Ok(response) if (200..300).contains(&response.status()) => {
                let mime = response.header("Content-Type").map(str::to_string);

                Response::ok(response.into_reader(), mime)
            }

            Ok(response) => Response::status(response.status()),

            Err(Error::Status(code, _)) => Response::status(code),

            Err(Error::Transport(transport)) => Response::network_error(transport.to_string()),
        }
    }
}

impl UReqFetcher {
    pub fn new() -> Self {
        Self::with_user_agent(DEFAULT_USER_AGENT)
    }

    pub fn with_user_agent(user_agent: &str) -> Self {
        let agent = AgentBuilder::new().user_agent(user_agent).build();

        UReqFetcher { agent }
    }
}

impl Default for UReqFetcher {
    fn default() -> Self {
        Self::new()
    }
}
