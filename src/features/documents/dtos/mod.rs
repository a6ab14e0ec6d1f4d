mod document_dto;

pub use document_dto::{
    DocumentResponseDto, DocumentUpload, ListDocumentsQuery, UpdateDocumentDto,
};
