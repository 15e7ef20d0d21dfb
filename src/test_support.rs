//! In-memory fakes of the domain ports, shared by unit tests across layers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::auth::{
  AuthService, AuthServiceConfig, Email, Password, PasswordCredentialVerifier,
  PasswordHasher as _, RepositoryError, Session, SessionRepository, User, UserRepository,
};
use crate::domain::invoice::{
  CacheError, CacheLookup, Customer, CustomerId, CustomerRepository, CustomerSummary, Invoice,
  InvoiceError, InvoiceFields, InvoiceRepository, InvoiceService, InvoiceServiceConfig,
  InvoiceServiceDependencies, InvoiceStatus, InvoiceSummary, ListingCache,
};
use crate::infrastructure::security::Argon2PasswordHasher;

// ============================================================================
// Invoices and customers
// ============================================================================

#[derive(Default)]
pub struct InMemoryInvoiceStore {
  customers: Mutex<Vec<Customer>>,
  invoices: Mutex<Vec<Invoice>>,
  failing: bool,
}

impl InMemoryInvoiceStore {
  pub fn with_customer(name: &str) -> Self {
    let store = Self::default();
    store.add_customer(name);
    store
  }

  /// A store whose every call fails like an unreachable database
  pub fn failing() -> Self {
    Self {
      failing: true,
      ..Self::default()
    }
  }

  pub fn add_customer(&self, name: &str) -> CustomerId {
    self.add_customer_with_id(&Uuid::new_v4().to_string(), name)
  }

  pub fn add_customer_with_id(&self, id: &str, name: &str) -> CustomerId {
    let customer = Customer {
      id: id.parse().unwrap(),
      name: name.to_string(),
      email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
      image_url: "/static/customers/placeholder.png".to_string(),
    };
    let id = customer.id.clone();
    self.customers.lock().unwrap().push(customer);
    id
  }

  pub fn first_customer_id(&self) -> CustomerId {
    self.customers.lock().unwrap()[0].id.clone()
  }

  pub fn insert(&self, invoice: Invoice) {
    self.invoices.lock().unwrap().push(invoice);
  }

  pub fn invoices(&self) -> Vec<Invoice> {
    self.invoices.lock().unwrap().clone()
  }

  fn check(&self) -> Result<(), InvoiceError> {
    if self.failing {
      return Err(InvoiceError::Database(sqlx::Error::PoolTimedOut));
    }
    Ok(())
  }

  // Mirrors the foreign key from invoices to customers
  fn check_customer(&self, id: &CustomerId) -> Result<(), InvoiceError> {
    if self.customers.lock().unwrap().iter().any(|c| &c.id == id) {
      Ok(())
    } else {
      Err(InvoiceError::UnknownCustomer(id.clone()))
    }
  }

  fn summaries(&self, query: &str) -> Vec<InvoiceSummary> {
    let needle = query.to_lowercase();
    let customers = self.customers.lock().unwrap();
    let mut rows: Vec<InvoiceSummary> = self
      .invoices
      .lock()
      .unwrap()
      .iter()
      .filter_map(|invoice| {
        let customer = customers.iter().find(|c| c.id == invoice.customer_id)?;
        Some(InvoiceSummary {
          id: invoice.id,
          amount: invoice.amount,
          status: invoice.status,
          date: invoice.date,
          customer_name: customer.name.clone(),
          customer_email: customer.email.clone(),
          customer_image_url: customer.image_url.clone(),
        })
      })
      .filter(|row| {
        needle.is_empty()
          || row.customer_name.to_lowercase().contains(&needle)
          || row.customer_email.to_lowercase().contains(&needle)
          || row.amount.value().to_string().contains(&needle)
          || row.date.to_string().contains(&needle)
          || row.status.as_str().contains(&needle)
      })
      .collect();
    rows.sort_by(|a, b| b.date.cmp(&a.date));
    rows
  }
}

#[async_trait]
impl InvoiceRepository for InMemoryInvoiceStore {
  async fn create(&self, invoice: Invoice) -> Result<Invoice, InvoiceError> {
    self.check()?;
    self.check_customer(&invoice.customer_id)?;
    self.invoices.lock().unwrap().push(invoice.clone());
    Ok(invoice)
  }

  async fn update(&self, id: Uuid, fields: InvoiceFields) -> Result<u64, InvoiceError> {
    self.check()?;
    let mut invoices = self.invoices.lock().unwrap();
    match invoices.iter_mut().find(|i| i.id == id) {
      Some(invoice) => {
        self.check_customer(&fields.customer_id)?;
        invoice.apply(fields);
        Ok(1)
      }
      None => Ok(0),
    }
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>, InvoiceError> {
    self.check()?;
    Ok(self.invoices.lock().unwrap().iter().find(|i| i.id == id).cloned())
  }

  async fn find_filtered(
    &self,
    query: &str,
    limit: i64,
    offset: i64,
  ) -> Result<Vec<InvoiceSummary>, InvoiceError> {
    self.check()?;
    Ok(
      self
        .summaries(query)
        .into_iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect(),
    )
  }

  async fn count_filtered(&self, query: &str) -> Result<i64, InvoiceError> {
    self.check()?;
    Ok(self.summaries(query).len() as i64)
  }

  async fn delete(&self, id: Uuid) -> Result<u64, InvoiceError> {
    self.check()?;
    let mut invoices = self.invoices.lock().unwrap();
    let before = invoices.len();
    invoices.retain(|i| i.id != id);
    Ok((before - invoices.len()) as u64)
  }
}

#[async_trait]
impl CustomerRepository for InMemoryInvoiceStore {
  async fn find_all(&self) -> Result<Vec<Customer>, InvoiceError> {
    self.check()?;
    let mut customers = self.customers.lock().unwrap().clone();
    customers.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(customers)
  }

  async fn find_summaries(&self, query: &str) -> Result<Vec<CustomerSummary>, InvoiceError> {
    self.check()?;
    let needle = query.to_lowercase();
    let invoices = self.invoices.lock().unwrap();
    let mut rows: Vec<CustomerSummary> = self
      .customers
      .lock()
      .unwrap()
      .iter()
      .filter(|c| {
        c.name.to_lowercase().contains(&needle) || c.email.to_lowercase().contains(&needle)
      })
      .map(|c| {
        let owned = invoices.iter().filter(|i| i.customer_id == c.id);
        let total_by = |status: InvoiceStatus| -> i64 {
          owned
            .clone()
            .filter(|i| i.status == status)
            .map(|i| i.amount.value())
            .sum()
        };
        CustomerSummary {
          id: c.id.clone(),
          name: c.name.clone(),
          email: c.email.clone(),
          image_url: c.image_url.clone(),
          total_invoices: owned.clone().count() as i64,
          total_pending_cents: total_by(InvoiceStatus::Pending),
          total_paid_cents: total_by(InvoiceStatus::Paid),
        }
      })
      .collect();
    rows.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(rows)
  }
}

/// An invoice service over the in-memory store with default settings
pub fn invoice_service(
  store: &Arc<InMemoryInvoiceStore>,
  cache: &Arc<RecordingListingCache>,
) -> Arc<InvoiceService> {
  Arc::new(InvoiceService::new(
    InvoiceServiceDependencies {
      invoice_repo: store.clone(),
      customer_repo: store.clone(),
      listing_cache: cache.clone(),
    },
    InvoiceServiceConfig::default(),
  ))
}

// ============================================================================
// Listing cache
// ============================================================================

/// Generation-keyed like the Redis cache: entries written under an older
/// generation of their path are never returned.
#[derive(Default)]
pub struct RecordingListingCache {
  generations: Mutex<HashMap<String, u64>>,
  entries: Mutex<HashMap<(String, u64, String), String>>,
  invalidations: Mutex<Vec<String>>,
  failing: bool,
}

impl RecordingListingCache {
  /// A cache whose backend is unreachable
  pub fn failing() -> Self {
    Self {
      failing: true,
      ..Self::default()
    }
  }

  pub fn invalidations(&self) -> Vec<String> {
    self.invalidations.lock().unwrap().clone()
  }
}

#[async_trait]
impl ListingCache for RecordingListingCache {
  async fn get(&self, path: &str, variant: &str) -> Result<CacheLookup, CacheError> {
    if self.failing {
      return Err(CacheError::Timeout);
    }
    let generation = self
      .generations
      .lock()
      .unwrap()
      .get(path)
      .copied()
      .unwrap_or(0);
    let body = self
      .entries
      .lock()
      .unwrap()
      .get(&(path.to_string(), generation, variant.to_string()))
      .cloned();
    Ok(CacheLookup { body, generation })
  }

  async fn put(
    &self,
    path: &str,
    variant: &str,
    generation: u64,
    body: &str,
  ) -> Result<(), CacheError> {
    if self.failing {
      return Err(CacheError::Timeout);
    }
    self.entries.lock().unwrap().insert(
      (path.to_string(), generation, variant.to_string()),
      body.to_string(),
    );
    Ok(())
  }

  async fn invalidate(&self, path: &str) -> Result<(), CacheError> {
    if self.failing {
      return Err(CacheError::Backend("connection refused".to_string()));
    }
    *self
      .generations
      .lock()
      .unwrap()
      .entry(path.to_string())
      .or_insert(0) += 1;
    self.invalidations.lock().unwrap().push(path.to_string());
    Ok(())
  }
}

// ============================================================================
// Users and sessions
// ============================================================================

#[derive(Default)]
pub struct InMemoryUserStore {
  users: Mutex<Vec<User>>,
  unavailable: bool,
}

impl InMemoryUserStore {
  /// A store holding one user whose password is hashed with Argon2
  pub async fn with_user(email: &str, password: &str) -> Self {
    let hasher = Argon2PasswordHasher::new().unwrap();
    let hash = hasher
      .hash(&Password::new(password).unwrap())
      .await
      .unwrap();
    Self::with_raw_hash(email, hash.as_str())
  }

  /// A store holding one user with an arbitrary stored hash string
  pub fn with_raw_hash(email: &str, password_hash: &str) -> Self {
    let store = Self::default();
    store.users.lock().unwrap().push(User::new(
      "User".to_string(),
      email.to_string(),
      password_hash.to_string(),
    ));
    store
  }

  pub fn unavailable() -> Self {
    Self {
      unavailable: true,
      ..Self::default()
    }
  }

  fn check(&self) -> Result<(), RepositoryError> {
    if self.unavailable {
      return Err(RepositoryError::ConnectionFailed("connection refused".to_string()));
    }
    Ok(())
  }
}

#[async_trait]
impl UserRepository for InMemoryUserStore {
  async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
    self.check()?;
    Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
  }

  async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
    self.check()?;
    Ok(
      self
        .users
        .lock()
        .unwrap()
        .iter()
        .find(|u| u.email.to_lowercase() == email.as_str())
        .cloned(),
    )
  }
}

#[derive(Default)]
pub struct InMemorySessionStore {
  sessions: Mutex<Vec<Session>>,
}

impl InMemorySessionStore {
  pub fn len(&self) -> usize {
    self.sessions.lock().unwrap().len()
  }
}

#[async_trait]
impl SessionRepository for InMemorySessionStore {
  async fn create(&self, session: Session) -> Result<Session, RepositoryError> {
    self.sessions.lock().unwrap().push(session.clone());
    Ok(session)
  }

  async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>, RepositoryError> {
    Ok(
      self
        .sessions
        .lock()
        .unwrap()
        .iter()
        .find(|s| s.token_hash == token_hash)
        .cloned(),
    )
  }

  async fn delete(&self, session_id: Uuid) -> Result<(), RepositoryError> {
    self.sessions.lock().unwrap().retain(|s| s.id != session_id);
    Ok(())
  }
}

/// An auth service over the in-memory user store with Argon2 hashing
pub fn auth_service(
  users: Arc<InMemoryUserStore>,
) -> (Arc<AuthService>, Arc<InMemorySessionStore>) {
  let sessions = Arc::new(InMemorySessionStore::default());
  let hasher = Arc::new(Argon2PasswordHasher::new().unwrap());
  let verifier = Arc::new(PasswordCredentialVerifier::new(users.clone(), hasher));
  let service = Arc::new(AuthService::new(
    verifier,
    users,
    sessions.clone(),
    AuthServiceConfig::default(),
  ));
  (service, sessions)
}
