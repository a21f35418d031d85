//! In-memory repositories for tests
//!
//! Every store counts the calls it receives so tests can assert that a
//! request was rejected before reaching persistence.

use super::*;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryQuotes {
    quotes: RwLock<Vec<Quote>>,
    calls: AtomicUsize,
    fail_writes: AtomicBool,
}

impl MemoryQuotes {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.quotes.read().await.len()
    }

    /// Make every write fail as if the database were unreachable
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Internal("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl QuoteRepository for MemoryQuotes {
    async fn insert(&self, quote: &Quote) -> Result<Quote, AppError> {
        self.touch();
        self.check_writable()?;
        self.quotes.write().await.push(quote.clone());
        Ok(quote.clone())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Quote>, AppError> {
        self.touch();
        Ok(self.quotes.read().await.iter().find(|q| q.id == id).cloned())
    }

    async fn list(&self, filter: &QuoteFilter) -> Result<(Vec<Quote>, i64), AppError> {
        self.touch();
        let quotes = self.quotes.read().await;
        let mut matching: Vec<Quote> = quotes
            .iter()
            .filter(|q| filter.status.map_or(true, |s| q.status == s))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(filter.page.offset as usize)
            .take(filter.page.limit as usize)
            .collect();
        Ok((page, total))
    }

    async fn update(
        &self,
        id: Uuid,
        changes: &QuoteChanges,
        from: &[QuoteStatus],
    ) -> Result<Option<Quote>, AppError> {
        self.touch();
        self.check_writable()?;
        let mut quotes = self.quotes.write().await;
        let Some(quote) = quotes
            .iter_mut()
            .find(|q| q.id == id && from.contains(&q.status))
        else {
            return Ok(None);
        };
        if let Some(status) = changes.status {
            quote.status = status;
        }
        if changes.clear_admin_notes {
            quote.admin_notes = None;
        } else if let Some(notes) = &changes.admin_notes {
            quote.admin_notes = Some(notes.clone());
        }
        quote.updated_at = Utc::now();
        Ok(Some(quote.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        self.touch();
        self.check_writable()?;
        let mut quotes = self.quotes.write().await;
        let before = quotes.len();
        quotes.retain(|q| q.id != id);
        Ok(quotes.len() != before)
    }
}

#[derive(Default)]
pub struct MemoryCatalog {
    products: RwLock<Vec<Product>>,
    categories: RwLock<Vec<Category>>,
}

impl MemoryCatalog {
    fn product_from(id: Uuid, input: &ProductInput) -> Product {
        let now = Utc::now();
        Product {
            id,
            slug: input.slug.clone(),
            name: input.name.clone(),
            description: input.description.clone(),
            price: input.price,
            status: input.status,
            category_id: input.category_id,
            is_featured: input.is_featured,
            created_at: now,
            updated_at: now,
        }
    }

    fn category_from(id: Uuid, input: &CategoryInput) -> Category {
        let now = Utc::now();
        Category {
            id,
            slug: input.slug.clone(),
            name: input.name.clone(),
            description: input.description.clone(),
            is_active: input.is_active,
            is_featured: input.is_featured,
            sort_order: input.sort_order,
            created_at: now,
            updated_at: now,
        }
    }
}

#[async_trait]
impl ProductRepository for MemoryCatalog {
    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, AppError> {
        let category_id = match &filter.category_slug {
            Some(slug) => {
                let categories = self.categories.read().await;
                match categories.iter().find(|c| &c.slug == slug) {
                    Some(c) => Some(c.id),
                    None => return Ok(Vec::new()),
                }
            }
            None => None,
        };

        let products = self.products.read().await;
        Ok(products
            .iter()
            .filter(|p| filter.status.map_or(true, |s| p.status == s))
            .filter(|p| category_id.map_or(true, |c| p.category_id == Some(c)))
            .filter(|p| !filter.featured_only || p.is_featured)
            .skip(filter.page.offset as usize)
            .take(filter.page.limit as usize)
            .cloned()
            .collect())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        Ok(self.products.read().await.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Product>, AppError> {
        Ok(self.products.read().await.iter().find(|p| p.slug == slug).cloned())
    }

    async fn insert(&self, input: &ProductInput) -> Result<Product, AppError> {
        let mut products = self.products.write().await;
        if products.iter().any(|p| p.slug == input.slug) {
            return Err(AppError::Conflict(format!("Slug '{}' is already in use", input.slug)));
        }
        let product = Self::product_from(Uuid::new_v4(), input);
        products.push(product.clone());
        Ok(product)
    }

    async fn update(&self, id: Uuid, input: &ProductInput) -> Result<Option<Product>, AppError> {
        let mut products = self.products.write().await;
        if products.iter().any(|p| p.slug == input.slug && p.id != id) {
            return Err(AppError::Conflict(format!("Slug '{}' is already in use", input.slug)));
        }
        let Some(existing) = products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        let created_at = existing.created_at;
        *existing = Product {
            created_at,
            ..Self::product_from(id, input)
        };
        Ok(Some(existing.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut products = self.products.write().await;
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() != before)
    }
}

#[async_trait]
impl CategoryRepository for MemoryCatalog {
    async fn list(&self, filter: &CategoryFilter) -> Result<Vec<Category>, AppError> {
        let mut categories: Vec<Category> = self
            .categories
            .read()
            .await
            .iter()
            .filter(|c| !filter.active_only || c.is_active)
            .filter(|c| !filter.featured_only || c.is_featured)
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.name.cmp(&b.name)));
        if let Some(limit) = filter.limit {
            categories.truncate(limit as usize);
        }
        Ok(categories)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Category>, AppError> {
        Ok(self.categories.read().await.iter().find(|c| c.id == id).cloned())
    }

    async fn insert(&self, input: &CategoryInput) -> Result<Category, AppError> {
        let mut categories = self.categories.write().await;
        if categories.iter().any(|c| c.slug == input.slug) {
            return Err(AppError::Conflict(format!("Slug '{}' is already in use", input.slug)));
        }
        let category = Self::category_from(Uuid::new_v4(), input);
        categories.push(category.clone());
        Ok(category)
    }

    async fn update(&self, id: Uuid, input: &CategoryInput) -> Result<Option<Category>, AppError> {
        let mut categories = self.categories.write().await;
        if categories.iter().any(|c| c.slug == input.slug && c.id != id) {
            return Err(AppError::Conflict(format!("Slug '{}' is already in use", input.slug)));
        }
        let Some(existing) = categories.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        let created_at = existing.created_at;
        *existing = Category {
            created_at,
            ..Self::category_from(id, input)
        };
        Ok(Some(existing.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut categories = self.categories.write().await;
        let before = categories.len();
        categories.retain(|c| c.id != id);
        if categories.len() == before {
            return Ok(false);
        }
        for product in self.products.write().await.iter_mut() {
            if product.category_id == Some(id) {
                product.category_id = None;
            }
        }
        Ok(true)
    }
}

#[derive(Default)]
pub struct MemorySubscribers {
    subscribers: RwLock<Vec<Subscriber>>,
}

#[async_trait]
impl NewsletterRepository for MemorySubscribers {
    async fn find_by_email(&self, email: &str) -> Result<Option<Subscriber>, AppError> {
        Ok(self.subscribers.read().await.iter().find(|s| s.email == email).cloned())
    }

    async fn insert(&self, email: &str, name: Option<&str>, source: &str) -> Result<Subscriber, AppError> {
        let mut subscribers = self.subscribers.write().await;
        if subscribers.iter().any(|s| s.email == email) {
            return Err(AppError::Conflict(format!("{} is already subscribed", email)));
        }
        let subscriber = Subscriber {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: name.map(String::from),
            source: source.to_string(),
            is_subscribed: true,
            subscribed_at: Utc::now(),
            unsubscribed_at: None,
        };
        subscribers.push(subscriber.clone());
        Ok(subscriber)
    }

    async fn set_subscribed(&self, id: Uuid, subscribed: bool) -> Result<Option<Subscriber>, AppError> {
        let mut subscribers = self.subscribers.write().await;
        let Some(subscriber) = subscribers.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        subscriber.is_subscribed = subscribed;
        if subscribed {
            subscriber.subscribed_at = Utc::now();
            subscriber.unsubscribed_at = None;
        } else {
            subscriber.unsubscribed_at = Some(Utc::now());
        }
        Ok(Some(subscriber.clone()))
    }

    async fn list(&self, subscribed: Option<bool>) -> Result<Vec<Subscriber>, AppError> {
        Ok(self
            .subscribers
            .read()
            .await
            .iter()
            .filter(|s| subscribed.map_or(true, |flag| s.is_subscribed == flag))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut subscribers = self.subscribers.write().await;
        let before = subscribers.len();
        subscribers.retain(|s| s.id != id);
        Ok(subscribers.len() != before)
    }
}

#[derive(Default)]
pub struct MemoryTranslations {
    languages: RwLock<Vec<Language>>,
    entries: RwLock<Vec<TranslationEntry>>,
}

impl MemoryTranslations {
    pub async fn add_language(&self, code: &str, name: &str, is_active: bool, is_default: bool) {
        self.languages.write().await.push(Language {
            code: code.to_string(),
            name: name.to_string(),
            is_active,
            is_default,
        });
    }

    pub async fn add_entry(&self, language: &str, namespace: &str, key: &str, value: &str) {
        self.entries.write().await.push(TranslationEntry {
            language_code: language.to_string(),
            namespace: namespace.to_string(),
            key: key.to_string(),
            value: value.to_string(),
        });
    }
}

#[async_trait]
impl TranslationRepository for MemoryTranslations {
    async fn find_language(&self, code: &str) -> Result<Option<Language>, AppError> {
        Ok(self.languages.read().await.iter().find(|l| l.code == code).cloned())
    }

    async fn default_language(&self) -> Result<Option<Language>, AppError> {
        Ok(self.languages.read().await.iter().find(|l| l.is_default).cloned())
    }

    async fn list_languages(&self, active_only: bool) -> Result<Vec<Language>, AppError> {
        Ok(self
            .languages
            .read()
            .await
            .iter()
            .filter(|l| !active_only || l.is_active)
            .cloned()
            .collect())
    }

    async fn entries(&self, language: &str, namespace: Option<&str>) -> Result<Vec<TranslationEntry>, AppError> {
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .filter(|e| e.language_code == language)
            .filter(|e| namespace.map_or(true, |ns| e.namespace == ns))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct MemoryOptions {
    options: RwLock<HashMap<String, SiteOption>>,
}

#[async_trait]
impl SiteOptionRepository for MemoryOptions {
    async fn list(&self) -> Result<Vec<SiteOption>, AppError> {
        let mut options: Vec<SiteOption> = self.options.read().await.values().cloned().collect();
        options.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(options)
    }

    async fn upsert(&self, key: &str, value: &str) -> Result<SiteOption, AppError> {
        let option = SiteOption {
            key: key.to_string(),
            value: value.to_string(),
            updated_at: Utc::now(),
        };
        self.options.write().await.insert(key.to_string(), option.clone());
        Ok(option)
    }
}

#[derive(Default)]
pub struct MemoryAdmins {
    admins: RwLock<Vec<AdminUser>>,
}

#[async_trait]
impl AdminUserRepository for MemoryAdmins {
    async fn find_by_email(&self, email: &str) -> Result<Option<AdminUser>, AppError> {
        Ok(self.admins.read().await.iter().find(|a| a.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AdminUser>, AppError> {
        Ok(self.admins.read().await.iter().find(|a| a.id == id).cloned())
    }

    async fn insert(&self, email: &str, password_hash: &str, name: Option<&str>) -> Result<AdminUser, AppError> {
        let admin = AdminUser {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            name: name.map(String::from),
            created_at: Utc::now(),
        };
        self.admins.write().await.push(admin.clone());
        Ok(admin)
    }
}
