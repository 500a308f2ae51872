pub mod entity;
pub mod field_maps;
pub mod mapper;
pub mod migrations;
pub mod sea_orm_repo;
