// ABOUTME: Wire data models returned by the mailserver operations and consumed by toast producers

pub mod responses;

pub use responses::{
    AliasListResponse, AliasResponse, EmailsListResponse, ErrorResponse, StatusResponse,
    DOCKER_IMAGE,
};
