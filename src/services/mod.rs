pub mod object_service;
pub mod storage;
