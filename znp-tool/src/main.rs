use std::{ env::args, fs };
use anyhow::Context;
use futures::future::{ self, Either };
use serde::Deserialize;
use tracing::{ info, warn };
use tracing_subscriber::EnvFilter;
use znp::{ ZnpApi, ZnpConfig, ZnpPort, types::{ AddrMode, DeviceState } };

#[derive(Deserialize, Debug)]
struct ToolConfig {
	port: String,
	#[serde(default = "default_baud_rate")]
	baud_rate: u32,
	#[serde(default = "default_log")]
	log: String,
	#[serde(default)]
	soft_reset: bool,
	#[serde(default)]
	wait_for_coordinator: bool,
	//seconds, 0 closes the network
	#[serde(default)]
	permit_join: Option<u8>,
	#[serde(default)]
	znp: ZnpConfig
}

fn default_baud_rate() -> u32 {
	115200
}

fn default_log() -> String {
	"info".to_string()
}

fn init_logging(level: &str) {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(true)
		.with_writer(std::io::stderr)
		.compact()
		.try_init();
}

fn log_events(api: &ZnpApi) {
	let events = api.events();

	events.zdo_on_state_change.subscribe(|state| info!("Device state: {:?}", state)).persist();
	events.zdo_on_end_device_announce.subscribe(|a| info!("Device announce: 0x{:04X} {:016X}", a.nwk_addr, a.ieee_addr)).persist();
	events.zdo_on_trustcenter_device.subscribe(|d| info!("Trust center device: {:?}", d)).persist();
	events.zdo_on_permit_join.subscribe(|p| info!("Permit join: {}s", p.duration)).persist();
	events.zdo_on_leave.subscribe(|l| info!("Device left: 0x{:04X} {:016X}", l.src_addr, l.ext_addr)).persist();
	events.zdo_on_node_desc.subscribe(|d| info!("Node descriptor: {:?}", d)).persist();
	events.zdo_on_active_ep.subscribe(|e| info!("Active endpoints: {:?}", e)).persist();
	events.zdo_on_simple_desc.subscribe(|d| info!("Simple descriptor: {:?}", d)).persist();
	events.app_cnf_on_bdb_commissioning_notification.subscribe(|n| info!("Commissioning: {:?}", n)).persist();
	events.af_on_incoming_msg.subscribe(|m| {
		info!("Message from 0x{:04X}/{} cluster 0x{:04X}: {}", m.src_addr, m.src_endpoint, m.cluster_id, hex::encode(&m.data));
	}).persist();
}

async fn bring_up(api: ZnpApi, config: &ToolConfig) -> anyhow::Result<()> {
	log_events(&api);

	let reset = api.sys_reset(config.soft_reset).await.context("Reset failed")?;
	info!("Reset: {}", reset);

	let capabilities = api.sys_ping().await.context("Ping failed")?;
	info!("Capabilities: {}", capabilities);

	let version = api.sys_version().await.context("Version query failed")?;
	info!("Version: {}", version);

	let state = api.sapi_get_device_info::<DeviceState>().await?;
	info!("Current state: {:?}", state);

	if config.wait_for_coordinator && state != DeviceState::ZbCoord {
		use DeviceState::*;

		let startup = api.zdo_startup_from_app(100).await?;
		info!("Startup: {:?}", startup);

		let state = api.wait_for_state(&[ZbCoord], &[Hold, Init, NwkDisc, NwkJoining, CoordStarting]).await
			.context("Coordinator did not start")?;
		info!("Network up: {:?}", state);
	}

	if let Some(duration) = config.permit_join {
		match api.zdo_mgmt_permit_join(AddrMode::ShortAddress, 0, duration, 0).await {
			Ok(_) => info!("Joining permitted for {}s", duration),
			Err(e) => warn!("Permit join failed: {}", e)
		}
	}

	future::pending::<()>().await;

	Ok(())
}

#[cfg_attr(feature = "async-std", async_std::main)]
async fn main() -> anyhow::Result<()> {
	let path = match args().nth(1) {
		None => "./config.json".to_string(),
		Some(s) => s
	};

	let data = fs::read_to_string(&path).with_context(|| format!("Unable to read {}", path))?;
	let config: ToolConfig = serde_json::from_str(&data).context("Bad config file")?;

	init_logging(&config.log);

	let stream = frames::frames_serialport::open(&config.port, config.baud_rate)?;
	let api = ZnpApi::new(config.znp.clone());
	let mut port = ZnpPort::new(stream, api.clone());

	info!("Opened {} at {} baud", config.port, config.baud_rate);

	let pump = port.run();
	let session = bring_up(api, &config);

	futures::pin_mut!(pump, session);

	match future::select(pump, session).await {
		Either::Left((result, _)) => result.context("Port closed")?,
		Either::Right((result, _)) => result?
	}

	Ok(())
}
