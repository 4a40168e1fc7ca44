pub mod api;

use crate::agent::PerfumeAdvisor;
use crate::cli::Args;
use std::error::Error;
use std::sync::Arc;

pub struct Server {
    addr: String,
    advisor: Arc<PerfumeAdvisor>,
    args: Args,
}

impl Server {
    pub fn new(addr: String, advisor: Arc<PerfumeAdvisor>, args: Args) -> Self {
        Self { addr, advisor, args }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        api::start_http_server(&self.addr, Arc::clone(&self.advisor), &self.args).await
    }
}
