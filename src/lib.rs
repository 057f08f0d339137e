pub mod consts {
    pub mod consts;
}
pub mod gateway;
pub mod model;
pub mod server;
pub mod validation;
