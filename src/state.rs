use crate::{
    assets::AssetClient,
    db::{DbPool, OrmConn},
    mail::Mailer,
};

/// Shared services handed to every handler. Built once at startup and
/// read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub mailer: Mailer,
    pub assets: AssetClient,
    pub cookie_secure: bool,
}
