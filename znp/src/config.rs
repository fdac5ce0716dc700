use std::time::Duration;
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ZnpConfig {
	/// Confirmation window of Bind, Unbind and MgmtBind, 0 waits forever.
	pub zdo_timeout_secs: u64,
	/// Window for `AF_DATA_CONFIRM`, none waits forever.
	pub data_confirm_timeout_secs: Option<u64>,
	pub poll_interval_ms: u64
}

impl Default for ZnpConfig {
	fn default() -> Self {
		Self {
			zdo_timeout_secs: 15,
			data_confirm_timeout_secs: None,
			poll_interval_ms: 1
		}
	}
}

fn secs(value: u64) -> Option<Duration> {
	if value == 0 { None } else { Some(Duration::from_secs(value)) }
}

impl ZnpConfig {
	pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(data)
	}

	pub fn zdo_timeout(&self) -> Option<Duration> {
		secs(self.zdo_timeout_secs)
	}

	pub fn data_confirm_timeout(&self) -> Option<Duration> {
		self.data_confirm_timeout_secs.and_then(secs)
	}

	pub fn poll_interval(&self) -> Duration {
		Duration::from_millis(self.poll_interval_ms)
	}
}
