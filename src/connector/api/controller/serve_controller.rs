use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use anyhow::Result;
use tracing::{info, warn};

use crate::connector::adapter::http::{build_router, serve};

use super::super::Container;

pub struct ServeController<'a> {
    container: &'a Container,
}

impl<'a> ServeController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn serve(&self, port: u16, public: bool, static_dir: PathBuf) -> Result<String> {
        let ip = if public {
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        } else {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        };

        if !static_dir.join("index.html").is_file() {
            warn!(
                "No index.html under {}; the chat page will not be served",
                static_dir.display()
            );
        }

        info!(
            "Context file: {}, history limit: {}",
            self.container.config().context_file.display(),
            self.container.config().history_limit
        );

        let router = build_router(self.container.chatbot_use_case(), &static_dir);
        serve(router, SocketAddr::new(ip, port)).await?;

        Ok(String::new())
    }
}
