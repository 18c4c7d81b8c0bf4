use std::sync::Arc;

use crate::errors::Result;

pub mod backend;

pub use backend::SeaOrmStorage;

pub struct StorageFactory;

impl StorageFactory {
    pub async fn create() -> Result<Arc<SeaOrmStorage>> {
        let config = crate::config::get_config();
        let database_url = &config.database.database_url;

        // 显式配置优先，否则从 URL 自动推断数据库类型
        let backend_type = match config.database.backend {
            Some(ref name) => backend::normalize_backend_name(name),
            None => backend::infer_backend_from_url(database_url)?,
        };

        let storage = backend::SeaOrmStorage::new(database_url, &backend_type).await?;
        Ok(Arc::new(storage))
    }
}
