use crate::core::verifier::{email_domain, DomainVerifier};
use crate::core::{HttpTransport, SessionAuthenticator, StudentStatus};
use crate::utils::error::Result;

/// Authenticates the session cookie first, then checks the email domain.
pub struct StudentVerification<A: SessionAuthenticator, T: HttpTransport> {
    authenticator: A,
    verifier: DomainVerifier<T>,
}

impl<A: SessionAuthenticator, T: HttpTransport> StudentVerification<A, T> {
    pub fn new(authenticator: A, verifier: DomainVerifier<T>) -> Self {
        Self {
            authenticator,
            verifier,
        }
    }

    pub async fn verify(&self, session_cookie: &str, email: &str) -> Result<StudentStatus> {
        let domain = email_domain(email)?;

        let Some(session) = self.authenticator.authenticate_cookie(session_cookie).await? else {
            tracing::info!("Session cookie not recognised; skipping domain check");
            return Ok(StudentStatus::Unauthenticated);
        };

        if self.verifier.check(&domain).await? {
            tracing::info!("{} verified as a school domain", domain);
            Ok(StudentStatus::Verified {
                user_id: session.user_id,
                domain,
            })
        } else {
            Ok(StudentStatus::NotStudent { domain })
        }
    }
}
