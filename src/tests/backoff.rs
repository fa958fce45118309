#[cfg(test)]
mod test {
    use httpmock::Method::POST;
    use httpmock::MockServer;

    use crate::error::{ExchangeError, OAuthError};
    use crate::provider::OAuthProvider;
    use crate::tests::common::{init_tracing, mock_token_endpoint, test_config, TOKEN_PATH};

    #[tokio::test]
    async fn failures_extend_backoff_and_success_resets_it() {
        init_tracing();
        let server = MockServer::start_async().await;
        let failing = server.mock(|when, then| {
            when.method(POST).path(TOKEN_PATH);
            then.status(500);
        });

        let provider =
            OAuthProvider::new(test_config(server.url(TOKEN_PATH), None, false)).unwrap();

        let err = provider.get_token("OPERATE").await.unwrap_err();
        assert!(matches!(
            err,
            OAuthError::Exchange(ExchangeError::Rejected(_))
        ));
        assert_eq!(provider.failure_state().await, (true, 1));
        assert_eq!(provider.next_delay_ms().await, 1000);

        // second attempt sleeps 1000ms, fails again, extends the delay
        let _ = provider.get_token("OPERATE").await.unwrap_err();
        assert_eq!(provider.failure_state().await, (true, 2));
        assert_eq!(provider.next_delay_ms().await, 2000);

        failing.delete_async().await;
        let _recovered = mock_token_endpoint(&server, "recovered-tok", 600);

        assert_eq!(provider.get_token("OPERATE").await.unwrap(), "recovered-tok");
        assert_eq!(provider.failure_state().await, (false, 0));
        assert_eq!(provider.next_delay_ms().await, 1);
    }

    #[tokio::test]
    async fn failure_state_is_shared_across_audiences() {
        init_tracing();
        let server = MockServer::start_async().await;
        let _failing = server.mock(|when, then| {
            when.method(POST).path(TOKEN_PATH);
            then.status(503);
        });

        let provider =
            OAuthProvider::new(test_config(server.url(TOKEN_PATH), None, false)).unwrap();

        let _ = provider.get_token("OPERATE").await.unwrap_err();
        // the streak is per engine: an unrelated audience inherits the delay
        assert_eq!(provider.next_delay_ms().await, 1000);
        let _ = provider.get_token("TASKLIST").await.unwrap_err();
        assert_eq!(provider.failure_state().await, (true, 2));
    }

    #[tokio::test]
    async fn malformed_body_counts_as_an_exchange_failure() {
        init_tracing();
        let server = MockServer::start_async().await;
        let _mock = server.mock(|when, then| {
            when.method(POST).path(TOKEN_PATH);
            then.status(200).body("surprise, not json");
        });

        let provider =
            OAuthProvider::new(test_config(server.url(TOKEN_PATH), None, false)).unwrap();

        let err = provider.get_token("OPERATE").await.unwrap_err();
        assert!(matches!(
            err,
            OAuthError::Exchange(ExchangeError::Malformed(_))
        ));
        assert_eq!(provider.failure_state().await, (true, 1));
    }

    #[tokio::test]
    async fn unreachable_endpoint_counts_as_an_exchange_failure() {
        init_tracing();
        // nothing listens on port 1
        let provider =
            OAuthProvider::new(test_config("http://127.0.0.1:1".to_owned(), None, false))
                .unwrap();

        let err = provider.get_token("OPERATE").await.unwrap_err();
        assert!(matches!(
            err,
            OAuthError::Exchange(ExchangeError::Unreachable(_))
        ));
        assert_eq!(provider.failure_state().await, (true, 1));
    }
}
