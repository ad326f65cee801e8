use std::sync::Arc;

use passion_service::MatchService;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<MatchService>,
}
impl AppState {
	pub async fn new(config: passion_config::Config) -> color_eyre::Result<Self> {
		let service = MatchService::connect(config).await?;

		Ok(Self::from_service(service))
	}

	pub fn from_service(service: MatchService) -> Self {
		Self { service: Arc::new(service) }
	}
}
