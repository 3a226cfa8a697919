// 🏦 Bank Mappers
// Column layouts for each supported Chilean bank export

pub mod bancochile;
pub mod itau;
pub mod santander;

pub use bancochile::BancoChileMapper;
pub use itau::ItauMapper;
pub use santander::SantanderMapper;
