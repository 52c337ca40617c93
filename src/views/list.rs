//! Sessions list.

use async_stream::stream;
use futures::Stream;

use super::{Route, ViewContext};
use crate::api::ApiError;
use crate::models::{SessionInformation, YogaSession};

pub struct ListView {
    ctx: ViewContext,
}

impl ListView {
    pub fn new(ctx: ViewContext) -> Self {
        Self { ctx }
    }

    /// The list of sessions as a lazy stream.
    ///
    /// Nothing is fetched until the stream is polled, and every stream
    /// returned performs its own request; results are never cached here.
    pub fn sessions(&self) -> impl Stream<Item = Result<Vec<YogaSession>, ApiError>> + Send + 'static {
        let gateway = self.ctx.sessions.clone();
        stream! {
            yield gateway.all().await;
        }
    }

    pub fn user(&self) -> Option<SessionInformation> {
        self.ctx.store.session_information()
    }

    /// Whether the "Create" and "Edit" controls are shown
    pub fn can_manage(&self) -> bool {
        self.ctx.store.is_admin()
    }

    pub fn open_detail(&self, session_id: u64) {
        self.ctx.navigate(Route::SessionDetail(session_id));
    }

    pub fn open_create(&self) {
        self.ctx.navigate(Route::SessionCreate);
    }

    pub fn open_update(&self, session_id: u64) {
        self.ctx.navigate(Route::SessionUpdate(session_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixtures, FakeApi};
    use futures::StreamExt;
    use serde_json::json;

    #[tokio::test]
    async fn test_each_subscription_fetches() {
        let api = FakeApi::start().await;
        api.respond("GET", "/api/session", 200, json!([fixtures::session_json(123, 1, &[])]));
        api.respond(
            "GET",
            "/api/session",
            200,
            json!([
                fixtures::session_json(123, 1, &[]),
                fixtures::session_json(124, 2, &[1])
            ]),
        );
        let (ctx, _) = api.context();
        let view = ListView::new(ctx);

        let sessions = view.sessions();
        // Lazy: building the stream sends nothing
        assert_eq!(api.count("GET", "/api/session"), 0);

        let first: Vec<_> = sessions.collect().await;
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].as_ref().unwrap().len(), 1);

        let second = view.sessions().boxed().next().await.unwrap().unwrap();
        assert_eq!(second.len(), 2);
        assert_eq!(api.count("GET", "/api/session"), 2);
    }

    #[tokio::test]
    async fn test_failure_is_yielded() {
        let api = FakeApi::start().await;
        api.respond("GET", "/api/session", 500, json!({"message": "boom"}));
        let (ctx, _) = api.context();

        let result = ListView::new(ctx).sessions().boxed().next().await.unwrap();
        assert_eq!(result.unwrap_err().code(), "server_error");
    }

    #[tokio::test]
    async fn test_admin_controls_and_navigation() {
        let api = FakeApi::start().await;
        let (ctx, _) = api.context();
        let view = ListView::new(ctx.clone());
        assert!(!view.can_manage());
        assert!(view.user().is_none());

        ctx.store.log_in(fixtures::identity(1, true));
        assert!(view.can_manage());

        view.open_create();
        assert_eq!(ctx.navigator.current(), Route::SessionCreate);
        view.open_update(123);
        assert_eq!(ctx.navigator.current(), Route::SessionUpdate(123));
        view.open_detail(123);
        assert_eq!(ctx.navigator.current(), Route::SessionDetail(123));
    }
}
