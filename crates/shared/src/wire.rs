//! Protobuf encoding of the workspace view messages.
//!
//! Field numbers are part of the compatibility contract with existing peers
//! and must never be renumbered. `ViewType` is carried as its varint value
//! (`Blank = 0`, `Doc = 1`), which is byte-identical to a protobuf enum field.
//! Timestamps are whole Unix seconds; encoding refuses anything finer so a
//! decode always yields the value that was encoded.

use chrono::{DateTime, Utc};
use prost::Message;
use thiserror::Error;

use crate::{
    domain::{ViewId, ViewType},
    protocol::{CreateViewParams, CreateViewRequest, RepeatedView, View},
};

#[derive(Debug, Error)]
pub enum WireError {
    #[error("malformed protobuf payload: {0}")]
    Decode(#[from] prost::DecodeError),
    #[error("unknown view type {0}")]
    UnknownViewType(i32),
    #[error("timestamp {value} in field `{field}` is out of range")]
    InvalidTimestamp { field: &'static str, value: i64 },
    #[error("timestamp in field `{field}` has sub-second precision ({value}), wire carries whole seconds")]
    SubsecondTimestamp {
        field: &'static str,
        value: DateTime<Utc>,
    },
}

#[derive(Clone, PartialEq, Message)]
pub struct CreateViewRequestPb {
    #[prost(string, tag = "1")]
    pub belong_to_id: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(string, tag = "3")]
    pub description: String,
    #[prost(oneof = "OneOfThumbnail", tags = "4")]
    pub one_of_thumbnail: Option<OneOfThumbnail>,
    #[prost(int32, tag = "5")]
    pub view_type: i32,
}

#[derive(Clone, PartialEq, prost::Oneof)]
pub enum OneOfThumbnail {
    #[prost(string, tag = "4")]
    Thumbnail(String),
}

#[derive(Clone, PartialEq, Message)]
pub struct CreateViewParamsPb {
    #[prost(string, tag = "1")]
    pub belong_to_id: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(string, tag = "3")]
    pub description: String,
    #[prost(string, tag = "4")]
    pub thumbnail: String,
    #[prost(int32, tag = "5")]
    pub view_type: i32,
    #[prost(string, tag = "6")]
    pub view_data: String,
    #[prost(string, tag = "7")]
    pub view_id: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct ViewPb {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub belong_to_id: String,
    #[prost(string, tag = "3")]
    pub name: String,
    #[prost(string, tag = "4")]
    pub description: String,
    #[prost(int32, tag = "5")]
    pub view_type: i32,
    #[prost(int64, tag = "6")]
    pub version: i64,
    #[prost(message, optional, tag = "7")]
    pub belongings: Option<RepeatedViewPb>,
    #[prost(int64, tag = "8")]
    pub modified_time: i64,
    #[prost(int64, tag = "9")]
    pub create_time: i64,
}

#[derive(Clone, PartialEq, Message)]
pub struct RepeatedViewPb {
    #[prost(message, repeated, tag = "1")]
    pub items: Vec<ViewPb>,
}

fn view_type_from_wire(value: i32) -> Result<ViewType, WireError> {
    ViewType::try_from(value).map_err(WireError::UnknownViewType)
}

fn timestamp_to_wire(field: &'static str, value: DateTime<Utc>) -> Result<i64, WireError> {
    if value.timestamp_subsec_nanos() != 0 {
        return Err(WireError::SubsecondTimestamp { field, value });
    }
    Ok(value.timestamp())
}

fn timestamp_from_wire(field: &'static str, value: i64) -> Result<DateTime<Utc>, WireError> {
    DateTime::<Utc>::from_timestamp(value, 0).ok_or(WireError::InvalidTimestamp { field, value })
}

impl From<&CreateViewRequest> for CreateViewRequestPb {
    fn from(value: &CreateViewRequest) -> Self {
        Self {
            belong_to_id: value.belong_to_id.clone(),
            name: value.name.clone(),
            description: value.description.clone(),
            one_of_thumbnail: value.thumbnail.clone().map(OneOfThumbnail::Thumbnail),
            view_type: value.view_type.as_i32(),
        }
    }
}

impl TryFrom<CreateViewRequestPb> for CreateViewRequest {
    type Error = WireError;

    fn try_from(value: CreateViewRequestPb) -> Result<Self, Self::Error> {
        Ok(Self {
            view_type: view_type_from_wire(value.view_type)?,
            belong_to_id: value.belong_to_id,
            name: value.name,
            description: value.description,
            thumbnail: value
                .one_of_thumbnail
                .map(|OneOfThumbnail::Thumbnail(thumbnail)| thumbnail),
        })
    }
}

impl From<&CreateViewParams> for CreateViewParamsPb {
    fn from(value: &CreateViewParams) -> Self {
        Self {
            belong_to_id: value.belong_to_id.clone(),
            name: value.name.clone(),
            description: value.description.clone(),
            thumbnail: value.thumbnail.clone(),
            view_type: value.view_type.as_i32(),
            view_data: value.view_data.clone(),
            view_id: value.view_id.0.clone(),
        }
    }
}

impl TryFrom<CreateViewParamsPb> for CreateViewParams {
    type Error = WireError;

    fn try_from(value: CreateViewParamsPb) -> Result<Self, Self::Error> {
        Ok(Self {
            view_type: view_type_from_wire(value.view_type)?,
            belong_to_id: value.belong_to_id,
            name: value.name,
            description: value.description,
            thumbnail: value.thumbnail,
            view_data: value.view_data,
            view_id: ViewId(value.view_id),
        })
    }
}

impl TryFrom<&View> for ViewPb {
    type Error = WireError;

    fn try_from(value: &View) -> Result<Self, Self::Error> {
        let belongings = if value.belongings.is_empty() {
            None
        } else {
            Some(RepeatedViewPb::try_from(&value.belongings)?)
        };
        Ok(Self {
            id: value.id.0.clone(),
            belong_to_id: value.belong_to_id.clone(),
            name: value.name.clone(),
            description: value.description.clone(),
            view_type: value.view_type.as_i32(),
            version: value.version,
            belongings,
            modified_time: timestamp_to_wire("modified_time", value.modified_time)?,
            create_time: timestamp_to_wire("create_time", value.create_time)?,
        })
    }
}

impl TryFrom<ViewPb> for View {
    type Error = WireError;

    fn try_from(value: ViewPb) -> Result<Self, Self::Error> {
        let belongings = match value.belongings {
            Some(repeated) => RepeatedView::try_from(repeated)?,
            None => RepeatedView::default(),
        };
        Ok(Self {
            id: ViewId(value.id),
            belong_to_id: value.belong_to_id,
            name: value.name,
            description: value.description,
            view_type: view_type_from_wire(value.view_type)?,
            version: value.version,
            belongings,
            modified_time: timestamp_from_wire("modified_time", value.modified_time)?,
            create_time: timestamp_from_wire("create_time", value.create_time)?,
        })
    }
}

impl TryFrom<&RepeatedView> for RepeatedViewPb {
    type Error = WireError;

    fn try_from(value: &RepeatedView) -> Result<Self, Self::Error> {
        let items = value
            .iter()
            .map(ViewPb::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { items })
    }
}

impl TryFrom<RepeatedViewPb> for RepeatedView {
    type Error = WireError;

    fn try_from(value: RepeatedViewPb) -> Result<Self, Self::Error> {
        let items = value
            .items
            .into_iter()
            .map(View::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { items })
    }
}

pub fn encode_create_view_request(request: &CreateViewRequest) -> Vec<u8> {
    CreateViewRequestPb::from(request).encode_to_vec()
}

pub fn decode_create_view_request(bytes: &[u8]) -> Result<CreateViewRequest, WireError> {
    CreateViewRequestPb::decode(bytes)?.try_into()
}

pub fn encode_create_view_params(params: &CreateViewParams) -> Vec<u8> {
    CreateViewParamsPb::from(params).encode_to_vec()
}

pub fn decode_create_view_params(bytes: &[u8]) -> Result<CreateViewParams, WireError> {
    CreateViewParamsPb::decode(bytes)?.try_into()
}

/// Fails if either timestamp carries sub-second precision.
pub fn encode_view(view: &View) -> Result<Vec<u8>, WireError> {
    Ok(ViewPb::try_from(view)?.encode_to_vec())
}

pub fn decode_view(bytes: &[u8]) -> Result<View, WireError> {
    ViewPb::decode(bytes)?.try_into()
}

#[cfg(test)]
#[path = "tests/wire_tests.rs"]
mod tests;
