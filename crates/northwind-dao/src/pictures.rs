//! Category pictures and employee photos.
//!
//! The stock Northwind images were stored by an Access OLE container and
//! carry a 78-byte header in front of the actual bitmap. Readers strip it
//! when its signature is present; writers store bytes as given.

use crate::dao::{EmployeeDao, ProductCategoryDao};
use northwind_core::{CategoryId, EmployeeId, Lookup, NorthwindResult};
use std::sync::Arc;
use tracing::debug;

/// Length of the OLE object header on legacy Northwind images.
pub const OLE_HEADER_LEN: usize = 78;

const OLE_SIGNATURE: [u8; 2] = [0x15, 0x1C];

/// Returns the image without its OLE header, or unchanged if it has none.
#[must_use]
pub fn strip_ole_header(bytes: &[u8]) -> &[u8] {
    if bytes.len() >= OLE_HEADER_LEN && bytes.starts_with(&OLE_SIGNATURE) {
        &bytes[OLE_HEADER_LEN..]
    } else {
        bytes
    }
}

/// Picture access for product categories.
#[derive(Clone)]
pub struct CategoryPictures {
    dao: Arc<dyn ProductCategoryDao>,
}

impl CategoryPictures {
    #[must_use]
    pub fn new(dao: Arc<dyn ProductCategoryDao>) -> Self {
        Self { dao }
    }

    /// The category's picture, or `None` if the category or picture is missing.
    pub async fn try_get(&self, id: CategoryId) -> NorthwindResult<Option<Vec<u8>>> {
        Ok(match self.dao.find(id).await? {
            Lookup::Found(category) => category
                .picture
                .map(|picture| strip_ole_header(&picture).to_vec()),
            Lookup::NotFound(_) => None,
        })
    }

    /// Replaces the picture. Returns `false` if the category does not exist.
    pub async fn update(&self, id: CategoryId, picture: Vec<u8>) -> NorthwindResult<bool> {
        debug!("Updating picture of category {} ({} bytes)", id, picture.len());
        let Lookup::Found(mut category) = self.dao.find(id).await? else {
            return Ok(false);
        };
        category.picture = Some(picture);
        self.dao.update(&category).await
    }

    /// Clears the picture. Returns `false` if the category does not exist.
    pub async fn destroy(&self, id: CategoryId) -> NorthwindResult<bool> {
        let Lookup::Found(mut category) = self.dao.find(id).await? else {
            return Ok(false);
        };
        category.picture = None;
        self.dao.update(&category).await
    }
}

/// Photo access for employees.
#[derive(Clone)]
pub struct EmployeePhotos {
    dao: Arc<dyn EmployeeDao>,
}

impl EmployeePhotos {
    #[must_use]
    pub fn new(dao: Arc<dyn EmployeeDao>) -> Self {
        Self { dao }
    }

    pub async fn try_get(&self, id: EmployeeId) -> NorthwindResult<Option<Vec<u8>>> {
        Ok(self
            .dao
            .find(id)
            .await?
            .found()
            .and_then(|employee| employee.photo)
            .map(|photo| strip_ole_header(&photo).to_vec()))
    }

    pub async fn update(&self, id: EmployeeId, photo: Vec<u8>) -> NorthwindResult<bool> {
        debug!("Updating photo of employee {} ({} bytes)", id, photo.len());
        let Some(mut employee) = self.dao.find(id).await?.found() else {
            return Ok(false);
        };
        employee.photo = Some(photo);
        self.dao.update(&employee).await
    }

    pub async fn destroy(&self, id: EmployeeId) -> NorthwindResult<bool> {
        let Some(mut employee) = self.dao.find(id).await?.found() else {
            return Ok(false);
        };
        employee.photo = None;
        self.dao.update(&employee).await
    }
}

impl std::fmt::Debug for CategoryPictures {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryPictures").finish_non_exhaustive()
    }
}

impl std::fmt::Debug for EmployeePhotos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmployeePhotos").finish_non_exhaustive()
    }
}
