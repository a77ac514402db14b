use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;
use faqtree::Workspace;
use tracing::instrument;

#[derive(Debug, Parser)]
#[command(about = "Serve the FAQ forest over HTTP")]
pub struct Serve {
    /// Address to listen on
    #[arg(long, env = "FAQ_ADDR", default_value = "127.0.0.1:3322")]
    addr: SocketAddr,
}

impl Serve {
    #[instrument(skip(self), fields(addr = %self.addr))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let workspace = Workspace::open(root)?;
        tracing::info!(
            "Serving {} question(s) from {}",
            workspace.store().len(),
            workspace.forest_path().display()
        );

        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(faqtree::server::serve(self.addr, workspace))?;
        Ok(())
    }
}
