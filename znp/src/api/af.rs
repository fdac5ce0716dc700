use std::future::Future;
use deku::{ self, prelude::* };
use tracing::warn;
use crate::{
	codec::{ self, ByteString, U16List },
	error::{ Error, Result },
	types::{ AfCommand, Latency, ShortAddress }
};
use super::{ check_only_status, check_status, then, Confirmation, ZnpApi };

/// Endpoint to register with `AF_REGISTER`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointDescriptor {
	pub endpoint: u8,
	pub profile_id: u16,
	pub device_id: u16,
	pub version: u8,
	pub latency: Latency,
	pub input_clusters: Vec<u16>,
	pub output_clusters: Vec<u16>
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataRequest {
	pub dst_addr: ShortAddress,
	pub dst_endpoint: u8,
	pub src_endpoint: u8,
	pub cluster_id: u16,
	pub trans_id: u8,
	pub options: u8,
	pub radius: u8,
	pub data: Vec<u8>
}

#[derive(Debug, DekuWrite)]
struct Register {
	endpoint: u8,
	profile_id: u16,
	device_id: u16,
	version: u8,
	latency: Latency,
	input_clusters: U16List,
	output_clusters: U16List
}

#[derive(Debug, DekuWrite)]
struct DataRequestPayload {
	dst_addr: u16,
	dst_endpoint: u8,
	src_endpoint: u8,
	cluster_id: u16,
	trans_id: u8,
	options: u8,
	radius: u8,
	data: ByteString
}

#[derive(Debug, DekuRead)]
struct DataConfirm {
	endpoint: u8,
	trans_id: u8
}

impl ZnpApi {
	pub fn af_register(&self, descriptor: EndpointDescriptor) -> impl Future<Output = Result<()>> {
		let request = Register {
			endpoint: descriptor.endpoint,
			profile_id: descriptor.profile_id,
			device_id: descriptor.device_id,
			version: descriptor.version,
			latency: descriptor.latency,
			input_clusters: U16List::new(descriptor.input_clusters),
			output_clusters: U16List::new(descriptor.output_clusters)
		};

		then(self.request(AfCommand::Register, &request), |r| check_only_status(&r))
	}

	/// Sends an application frame and waits for its `AF_DATA_CONFIRM`.
	///
	/// The confirmation is matched by command only, its echoed endpoint and
	/// transaction id are checked afterwards.
	pub fn af_data_request(&self, request: DataRequest) -> impl Future<Output = Result<()>> {
		let (dst_endpoint, trans_id) = (request.dst_endpoint, request.trans_id);

		let payload = DataRequestPayload {
			dst_addr: request.dst_addr,
			dst_endpoint: request.dst_endpoint,
			src_endpoint: request.src_endpoint,
			cluster_id: request.cluster_id,
			trans_id: request.trans_id,
			options: request.options,
			radius: request.radius,
			data: ByteString::new(request.data)
		};

		let confirmation = Confirmation {
			command: AfCommand::DataConfirm.into(),
			timeout: self.config().data_confirm_timeout(),
			prefix: Vec::new()
		};

		then(self.request_confirmed(AfCommand::DataRequest, &payload, confirmation), move |r| {
			let confirm: DataConfirm = codec::decode(&check_status(&r)?)?;

			if (confirm.endpoint, confirm.trans_id) != (dst_endpoint, trans_id) {
				warn!("AF_DATA_REQUEST & AF_DATA_CONFIRM synchronization mismatch!");
				return Err(Error::Correlation("AF_DATA_REQUEST & AF_DATA_CONFIRM synchronization mismatch"));
			}

			Ok(())
		})
	}
}
