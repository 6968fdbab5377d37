//! Two-factor verification codes
//!
//! Codes are generated, stored and checked on the service side, keyed by
//! session id. The customer only ever learns the code through a
//! [`DeliveryChannel`] (SMS, e-mail); callers of [`CodeStore::send_code`] get
//! back nothing but a masked destination.
//!
//! # Code lifecycle
//!
//! - Issuing a code for a session replaces any earlier code of that session
//! - A code expires after its time-to-live
//! - A code is revoked after too many wrong entries
//! - A correct entry consumes the code

use crate::types::PortalError;
use dashmap::DashMap;
use rand::Rng;
use std::time::{Duration, Instant};

/// Number of digits in a verification code
pub const CODE_LENGTH: usize = 6;

/// How long an issued code stays valid
pub const DEFAULT_CODE_TTL: Duration = Duration::from_secs(5 * 60);

/// Wrong entries allowed before a code is revoked
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Out-of-band transport for verification codes
pub trait DeliveryChannel: Send + Sync {
    /// Deliver `code` to `destination`
    fn deliver(&self, destination: &str, code: &str) -> Result<(), PortalError>;
}

/// Channel that writes codes to the log instead of sending them
///
/// Only meant for demos and local runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogChannel;

impl DeliveryChannel for LogChannel {
    fn deliver(&self, destination: &str, code: &str) -> Result<(), PortalError> {
        tracing::info!("Verification code for {}: {}", mask_destination(destination), code);
        Ok(())
    }
}

/// Issue and check codes for wizard sessions
pub trait Verifier {
    /// Issue a fresh code for `session` and deliver it to `destination`
    ///
    /// Returns the masked destination for display.
    fn send_code(&self, session: &str, destination: &str) -> Result<String, PortalError>;

    /// Check an entered code; a match consumes it
    fn check_code(&self, session: &str, code: &str) -> Result<(), PortalError>;

    /// Forget any code issued for `session`
    fn revoke(&self, session: &str);
}

/// Hide all but the edges of a phone number or e-mail address
///
/// `+31 612341234` becomes `+31 6****1234`, `jan@example.com` becomes
/// `j***@example.com`.
pub fn mask_destination(destination: &str) -> String {
    let trimmed = destination.trim();

    if let Some((local, domain)) = trimmed.split_once('@') {
        let first: String = local.chars().take(1).collect();
        return format!("{}***@{}", first, domain);
    }

    let chars: Vec<char> = trimmed.chars().collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    if chars.len() <= 9 {
        return format!("****{}", tail);
    }
    let head: String = chars[..5].iter().collect();
    format!("{}****{}", head, tail)
}

#[derive(Debug, Clone)]
struct IssuedCode {
    code: String,
    issued_at: Instant,
    failed_attempts: u32,
}

/// Concurrent store of issued codes
///
/// Shared by all sessions; wrap it in an `Arc` to hand it to several
/// wizards at once.
#[derive(Debug)]
pub struct CodeStore<C> {
    codes: DashMap<String, IssuedCode>,
    channel: C,
    ttl: Duration,
    max_attempts: u32,
}

impl<C: DeliveryChannel> CodeStore<C> {
    /// Create a store with the default time-to-live and attempt limit
    pub fn new(channel: C) -> Self {
        Self {
            codes: DashMap::new(),
            channel,
            ttl: DEFAULT_CODE_TTL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Whether a code is outstanding for `session`
    pub fn is_pending(&self, session: &str) -> bool {
        self.codes.contains_key(session)
    }

    /// Number of sessions with an outstanding code
    pub fn pending_count(&self) -> usize {
        self.codes.len()
    }

    /// Drop every code that outlived its time-to-live
    ///
    /// Returns how many codes were removed.
    pub fn purge_expired(&self) -> usize {
        let before = self.codes.len();
        self.codes.retain(|_, issued| issued.issued_at.elapsed() < self.ttl);
        let removed = before.saturating_sub(self.codes.len());
        if removed > 0 {
            tracing::debug!(removed, "Purged expired verification codes");
        }
        removed
    }

    fn generate_code() -> String {
        let value: u32 = rand::thread_rng().gen_range(0..1_000_000);
        format!("{:0width$}", value, width = CODE_LENGTH)
    }
}

impl<C: DeliveryChannel> Verifier for CodeStore<C> {
    fn send_code(&self, session: &str, destination: &str) -> Result<String, PortalError> {
        self.purge_expired();

        let code = Self::generate_code();
        self.channel.deliver(destination, &code)?;

        self.codes.insert(
            session.to_string(),
            IssuedCode {
                code,
                issued_at: Instant::now(),
                failed_attempts: 0,
            },
        );

        let masked = mask_destination(destination);
        tracing::debug!(session, "Issued verification code to {}", masked);
        Ok(masked)
    }

    fn check_code(&self, session: &str, code: &str) -> Result<(), PortalError> {
        let mut issued = self
            .codes
            .get_mut(session)
            .ok_or_else(|| PortalError::unknown_session(session))?;

        if issued.issued_at.elapsed() >= self.ttl {
            drop(issued);
            self.codes.remove(session);
            return Err(PortalError::code_expired(session));
        }

        if issued.code == code {
            drop(issued);
            self.codes.remove(session);
            tracing::debug!(session, "Verification code accepted");
            return Ok(());
        }

        issued.failed_attempts += 1;
        if issued.failed_attempts >= self.max_attempts {
            drop(issued);
            self.codes.remove(session);
            tracing::warn!(session, "Verification code revoked after too many attempts");
            return Err(PortalError::too_many_attempts(session));
        }

        Err(PortalError::invalid_code(session))
    }

    fn revoke(&self, session: &str) {
        self.codes.remove(session);
    }
}

/// Six single-digit input slots of the code entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeEntry {
    digits: [Option<char>; CODE_LENGTH],
}

impl CodeEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a digit into a slot; anything that is not `0-9` is ignored
    ///
    /// Returns whether the slot was written.
    pub fn set_digit(&mut self, index: usize, digit: char) -> bool {
        match self.digits.get_mut(index) {
            Some(slot) if digit.is_ascii_digit() => {
                *slot = Some(digit);
                true
            }
            _ => false,
        }
    }

    /// Clear a slot
    pub fn backspace(&mut self, index: usize) {
        if let Some(slot) = self.digits.get_mut(index) {
            *slot = None;
        }
    }

    /// Fill slots from the start with the digits of a pasted string
    pub fn fill(&mut self, pasted: &str) {
        self.clear();
        for (slot, digit) in self
            .digits
            .iter_mut()
            .zip(pasted.chars().filter(|c| c.is_ascii_digit()))
        {
            *slot = Some(digit);
        }
    }

    pub fn clear(&mut self) {
        self.digits = [None; CODE_LENGTH];
    }

    /// Every slot holds a digit
    pub fn is_complete(&self) -> bool {
        self.digits.iter().all(Option::is_some)
    }

    /// Digits entered so far, in slot order
    pub fn as_string(&self) -> String {
        self.digits.iter().flatten().collect()
    }
}
