mod issue_repository;
mod link_repository;
mod scan_repository;
mod web_page_repository;

pub use issue_repository::IssueRepository;
pub use link_repository::LinkRepository;
pub use scan_repository::ScanRepository;
pub use web_page_repository::WebPageRepository;
