use crate::client::http::{ApiClient, ApiError, RequestConfig, Transport};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Token source and sign-in surface the coordination layer depends on.
/// One implementation is backed by Firebase Auth outside this crate; the
/// alternate path is the server-proxied `SessionAuth` below. Consumers
/// only ever see this trait.
pub trait AuthProvider: Send {
    fn current_id_token(&self) -> Option<String>;

    /// Registers a listener invoked with the new token (or `None` on sign
    /// out). Returns an id for `unsubscribe`.
    fn on_token_change(&mut self, callback: Box<dyn FnMut(Option<&str>) + Send>) -> u64;

    fn unsubscribe(&mut self, subscription: u64);

    fn sign_in_with_email_and_password(&mut self, email: &str, password: &str)
    -> Result<(), AuthError>;

    fn create_user_with_email_and_password(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<(), AuthError>;

    fn sign_out(&mut self) -> Result<(), AuthError>;
}

type TokenListener = Box<dyn FnMut(Option<&str>) + Send>;

/// Server-proxied session authentication: credentials are exchanged for a
/// session token via the REST backend.
pub struct SessionAuth<T: Transport> {
    client: ApiClient<T>,
    token: Option<String>,
    listeners: Vec<(u64, TokenListener)>,
    next_subscription: u64,
}

impl<T: Transport> SessionAuth<T> {
    pub fn new(client: ApiClient<T>) -> Self {
        Self {
            client,
            token: None,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    fn set_token(&mut self, token: Option<String>) {
        self.token = token;
        let token = self.token.as_deref().map(str::to_string);
        for (_, listener) in &mut self.listeners {
            listener(token.as_deref());
        }
    }

    fn token_from_response(body: Option<serde_json::Value>) -> Result<String, AuthError> {
        body.as_ref()
            .and_then(|body| body.get("token"))
            .and_then(|token| token.as_str())
            .map(str::to_string)
            .ok_or(AuthError::InvalidCredentials)
    }

    fn map_credential_error(error: ApiError) -> AuthError {
        match error {
            ApiError::Status { status: 401, .. } => AuthError::InvalidCredentials,
            other => AuthError::Api(other),
        }
    }
}

impl<T: Transport> AuthProvider for SessionAuth<T> {
    fn current_id_token(&self) -> Option<String> {
        self.token.clone()
    }

    fn on_token_change(&mut self, callback: Box<dyn FnMut(Option<&str>) + Send>) -> u64 {
        self.next_subscription += 1;
        self.listeners.push((self.next_subscription, callback));
        self.next_subscription
    }

    fn unsubscribe(&mut self, subscription: u64) {
        self.listeners.retain(|(id, _)| *id != subscription);
    }

    fn sign_in_with_email_and_password(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        let response = self
            .client
            .request(
                RequestConfig::post("/auth/session")
                    .with_body(json!({ "email": email, "password": password }))
                    .with_credentials(),
            )
            .map_err(Self::map_credential_error)?;

        let token = Self::token_from_response(response.body)?;
        self.set_token(Some(token));
        Ok(())
    }

    fn create_user_with_email_and_password(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        let response = self
            .client
            .request(
                RequestConfig::post("/auth/users")
                    .with_body(json!({ "email": email, "password": password }))
                    .with_credentials(),
            )
            .map_err(AuthError::Api)?;

        let token = Self::token_from_response(response.body)?;
        self.set_token(Some(token));
        Ok(())
    }

    fn sign_out(&mut self) -> Result<(), AuthError> {
        let result = self
            .client
            .request(RequestConfig::delete("/auth/session").with_credentials());

        // The local session ends even if the server call failed.
        self.set_token(None);
        result.map(|_| ()).map_err(AuthError::Api)
    }
}

#[cfg(test)]
mod tests {
    use super::{AuthError, AuthProvider, SessionAuth};
    use crate::client::http::{ApiClient, HttpResponse, PreparedRequest, Transport};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    struct ScriptedTransport {
        responses: Vec<HttpResponse>,
    }

    impl Transport for ScriptedTransport {
        fn send(&mut self, _request: PreparedRequest) -> Result<HttpResponse, String> {
            Ok(self.responses.remove(0))
        }
    }

    fn auth_with(responses: Vec<HttpResponse>) -> SessionAuth<ScriptedTransport> {
        SessionAuth::new(ApiClient::new(
            "https://api.example.com",
            ScriptedTransport { responses },
        ))
    }

    #[test]
    fn sign_in_stores_token_and_notifies_listeners() {
        let mut auth = auth_with(vec![HttpResponse {
            status: 200,
            body: Some(json!({"token": "session-1"})),
        }]);

        let seen = Arc::new(Mutex::new(Vec::<Option<String>>::new()));
        let sink = Arc::clone(&seen);
        auth.on_token_change(Box::new(move |token| {
            sink.lock().expect("lock").push(token.map(str::to_string));
        }));

        auth.sign_in_with_email_and_password("a@b.co", "hunter2hunter2")
            .expect("sign in should succeed");

        assert_eq!(auth.current_id_token().as_deref(), Some("session-1"));
        assert_eq!(
            seen.lock().expect("lock").as_slice(),
            &[Some("session-1".to_string())]
        );
    }

    #[test]
    fn wrong_credentials_map_to_invalid_credentials() {
        let mut auth = auth_with(vec![HttpResponse {
            status: 401,
            body: None,
        }]);

        let result = auth.sign_in_with_email_and_password("a@b.co", "wrong");

        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
        assert!(auth.current_id_token().is_none());
    }

    #[test]
    fn sign_out_clears_token_even_on_server_failure() {
        let mut auth = auth_with(vec![
            HttpResponse {
                status: 200,
                body: Some(json!({"token": "session-1"})),
            },
            HttpResponse {
                status: 500,
                body: None,
            },
        ]);
        auth.sign_in_with_email_and_password("a@b.co", "hunter2hunter2")
            .expect("sign in should succeed");

        let result = auth.sign_out();

        assert!(result.is_err());
        assert!(auth.current_id_token().is_none());
    }

    #[test]
    fn unsubscribed_listener_stops_receiving_tokens() {
        let mut auth = auth_with(vec![
            HttpResponse {
                status: 200,
                body: Some(json!({"token": "one"})),
            },
            HttpResponse {
                status: 200,
                body: Some(json!({"token": "two"})),
            },
        ]);

        let seen = Arc::new(Mutex::new(0usize));
        let sink = Arc::clone(&seen);
        let subscription = auth.on_token_change(Box::new(move |_| {
            *sink.lock().expect("lock") += 1;
        }));

        auth.sign_in_with_email_and_password("a@b.co", "pw")
            .expect("sign in");
        auth.unsubscribe(subscription);
        auth.sign_in_with_email_and_password("a@b.co", "pw")
            .expect("sign in");

        assert_eq!(*seen.lock().expect("lock"), 1);
    }
}
