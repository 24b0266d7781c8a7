use crate::application::controller::PostListController;

#[derive(Clone)]
pub struct FrontendState {
    pub controller: PostListController,
}
