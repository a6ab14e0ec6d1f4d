use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::Result;
use crate::features::categories::models::Category;
use crate::features::categories::CategoryService;
use crate::features::documents::models::Document;
use crate::features::documents::DocumentService;
use crate::features::transparency::dtos::{
    DocumentDetailDto, DocumentSectionDto, SchoolTransparencyDto,
};

/// Read-only public view over schools and their published documents
pub struct TransparencyService {
    documents: Arc<DocumentService>,
    categories: Arc<CategoryService>,
}

impl TransparencyService {
    pub fn new(documents: Arc<DocumentService>, categories: Arc<CategoryService>) -> Self {
        Self {
            documents,
            categories,
        }
    }

    pub async fn school(&self, school_id: Uuid) -> Result<SchoolTransparencyDto> {
        let school = self.documents.school(school_id).await?;
        let (documents, categories) = tokio::try_join!(
            self.documents.list(school.id, Some(true)),
            self.categories.list(school.agency_id),
        )?;

        Ok(SchoolTransparencyDto {
            school: school.into(),
            sections: sections(documents, categories),
        })
    }

    pub async fn document(&self, document_id: Uuid) -> Result<DocumentDetailDto> {
        let document = self.documents.get_published(document_id).await?;
        let school = self.documents.school(document.school_id).await?;
        let category = match document.category_id {
            Some(id) => Some(self.categories.get(id).await?.into()),
            None => None,
        };
        let download_url = self.documents.download_url(&document).await?;

        Ok(DocumentDetailDto {
            document: document.into(),
            school: school.into(),
            category,
            download_url,
        })
    }
}

/// Bucket documents by category in category order, uncategorized last.
/// Empty categories are left out.
fn sections(documents: Vec<Document>, categories: Vec<Category>) -> Vec<DocumentSectionDto> {
    let mut by_category: HashMap<Uuid, Vec<Document>> = HashMap::new();
    let mut uncategorized = Vec::new();
    let known: HashMap<Uuid, &Category> = categories.iter().map(|c| (c.id, c)).collect();

    for document in documents {
        match document.category_id.filter(|id| known.contains_key(id)) {
            Some(id) => by_category.entry(id).or_default().push(document),
            None => uncategorized.push(document),
        }
    }

    let mut sections: Vec<DocumentSectionDto> = categories
        .into_iter()
        .filter_map(|category| {
            let documents = by_category.remove(&category.id)?;
            Some(DocumentSectionDto {
                category: Some(category.into()),
                documents: documents.into_iter().map(Into::into).collect(),
            })
        })
        .collect();

    if !uncategorized.is_empty() {
        sections.push(DocumentSectionDto {
            category: None,
            documents: uncategorized.into_iter().map(Into::into).collect(),
        });
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn category(name: &str) -> Category {
        Category {
            id: Uuid::new_v4(),
            agency_id: Uuid::new_v4(),
            name: name.to_string(),
            color: "#336699".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn document(title: &str, category_id: Option<Uuid>) -> Document {
        Document {
            id: Uuid::new_v4(),
            school_id: Uuid::new_v4(),
            category_id,
            title: title.to_string(),
            description: None,
            file_url: format!("http://files/{}.pdf", title),
            file_key: format!("public/{}.pdf", title),
            content_type: "application/pdf".to_string(),
            file_size: 1024,
            checksum: "00".to_string(),
            is_published: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn titles(section: &DocumentSectionDto) -> Vec<&str> {
        section.documents.iter().map(|d| d.title.as_str()).collect()
    }

    #[test]
    fn test_sections_follow_category_order_with_uncategorized_last() {
        let budget = category("Budget");
        let safety = category("Safety");
        let empty = category("Staffing");
        let documents = vec![
            document("misc", None),
            document("drill", Some(safety.id)),
            document("audit", Some(budget.id)),
            document("orphan", Some(Uuid::new_v4())),
            document("plan", Some(budget.id)),
        ];

        let result = sections(documents, vec![budget, safety, empty]);
        let names: Vec<Option<&str>> = result
            .iter()
            .map(|s| s.category.as_ref().map(|c| c.name.as_str()))
            .collect();
        assert_eq!(names, vec![Some("Budget"), Some("Safety"), None]);
        assert_eq!(titles(&result[0]), vec!["audit", "plan"]);
        assert_eq!(titles(&result[1]), vec!["drill"]);
        assert_eq!(titles(&result[2]), vec!["misc", "orphan"]);
    }

    #[test]
    fn test_no_documents_no_sections() {
        assert!(sections(Vec::new(), vec![category("Budget")]).is_empty());
    }
}
