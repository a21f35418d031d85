//! SQL query constants
//!
//! Contains the static SQL used by the repositories. Every statement is
//! parameterized; list filters are appended by the repositories with
//! numbered placeholders only.

// ---- quotes ---------------------------------------------------------------

pub const QUOTE_COLUMNS: &str =
    "id, reference, name, email, phone, company, message, status, admin_notes, created_at, updated_at";

pub const INSERT_QUOTE: &str = r#"
    INSERT INTO quote_requests
        (id, reference, name, email, phone, company, message, status, admin_notes, created_at, updated_at)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
"#;

pub const INSERT_QUOTE_ITEM: &str = r#"
    INSERT INTO quote_request_items (id, quote_id, position, product_id, product_name, quantity, notes)
    VALUES ($1, $2, $3, $4, $5, $6, $7)
"#;

pub const SELECT_QUOTE_ITEMS: &str = r#"
    SELECT id, quote_id, product_id, product_name, quantity, notes
    FROM quote_request_items
    WHERE quote_id = ANY($1)
    ORDER BY quote_id, position
"#;

pub const UPDATE_QUOTE: &str = r#"
    UPDATE quote_requests
    SET status = COALESCE($2, status),
        admin_notes = CASE WHEN $4 THEN NULL ELSE COALESCE($3, admin_notes) END,
        updated_at = NOW()
    WHERE id = $1 AND status = ANY($5)
"#;

pub const DELETE_QUOTE: &str = "DELETE FROM quote_requests WHERE id = $1";

// ---- catalog --------------------------------------------------------------

pub const PRODUCT_COLUMNS: &str =
    "p.id, p.slug, p.name, p.description, p.price, p.status, p.category_id, p.is_featured, p.created_at, p.updated_at";

pub const INSERT_PRODUCT: &str = r#"
    INSERT INTO products (id, slug, name, description, price, status, category_id, is_featured)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
    RETURNING id, slug, name, description, price, status, category_id, is_featured, created_at, updated_at
"#;

pub const UPDATE_PRODUCT: &str = r#"
    UPDATE products
    SET slug = $2, name = $3, description = $4, price = $5, status = $6,
        category_id = $7, is_featured = $8, updated_at = NOW()
    WHERE id = $1
    RETURNING id, slug, name, description, price, status, category_id, is_featured, created_at, updated_at
"#;

pub const DELETE_PRODUCT: &str = "DELETE FROM products WHERE id = $1";

pub const CATEGORY_COLUMNS: &str =
    "id, slug, name, description, is_active, is_featured, sort_order, created_at, updated_at";

pub const INSERT_CATEGORY: &str = r#"
    INSERT INTO categories (id, slug, name, description, is_active, is_featured, sort_order)
    VALUES ($1, $2, $3, $4, $5, $6, $7)
    RETURNING id, slug, name, description, is_active, is_featured, sort_order, created_at, updated_at
"#;

pub const UPDATE_CATEGORY: &str = r#"
    UPDATE categories
    SET slug = $2, name = $3, description = $4, is_active = $5, is_featured = $6,
        sort_order = $7, updated_at = NOW()
    WHERE id = $1
    RETURNING id, slug, name, description, is_active, is_featured, sort_order, created_at, updated_at
"#;

pub const DELETE_CATEGORY: &str = "DELETE FROM categories WHERE id = $1";

// ---- newsletter -----------------------------------------------------------

pub const SUBSCRIBER_COLUMNS: &str =
    "id, email, name, source, is_subscribed, subscribed_at, unsubscribed_at";

pub const INSERT_SUBSCRIBER: &str = r#"
    INSERT INTO newsletter_subscribers (id, email, name, source)
    VALUES ($1, $2, $3, $4)
    RETURNING id, email, name, source, is_subscribed, subscribed_at, unsubscribed_at
"#;

pub const SET_SUBSCRIBED: &str = r#"
    UPDATE newsletter_subscribers
    SET is_subscribed = $2,
        subscribed_at = CASE WHEN $2 THEN NOW() ELSE subscribed_at END,
        unsubscribed_at = CASE WHEN $2 THEN NULL ELSE NOW() END
    WHERE id = $1
    RETURNING id, email, name, source, is_subscribed, subscribed_at, unsubscribed_at
"#;

pub const DELETE_SUBSCRIBER: &str = "DELETE FROM newsletter_subscribers WHERE id = $1";

// ---- translations ---------------------------------------------------------

pub const SELECT_LANGUAGE: &str =
    "SELECT code, name, is_active, is_default FROM languages WHERE code = $1";

pub const SELECT_DEFAULT_LANGUAGE: &str =
    "SELECT code, name, is_active, is_default FROM languages WHERE is_default AND is_active LIMIT 1";

pub const SELECT_LANGUAGES: &str = r#"
    SELECT code, name, is_active, is_default
    FROM languages
    WHERE is_active OR NOT $1
    ORDER BY is_default DESC, name
"#;

pub const SELECT_TRANSLATIONS: &str = r#"
    SELECT language_code, namespace, key, value
    FROM translations
    WHERE language_code = $1
        AND ($2::TEXT IS NULL OR namespace = $2)
    ORDER BY namespace, key
"#;

// ---- site options ---------------------------------------------------------

pub const SELECT_OPTIONS: &str = "SELECT key, value, updated_at FROM site_options ORDER BY key";

pub const UPSERT_OPTION: &str = r#"
    INSERT INTO site_options (key, value, updated_at)
    VALUES ($1, $2, NOW())
    ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
    RETURNING key, value, updated_at
"#;

// ---- admin users ----------------------------------------------------------

pub const SELECT_ADMIN_BY_EMAIL: &str =
    "SELECT id, email, password_hash, name, created_at FROM admin_users WHERE email = $1";

pub const SELECT_ADMIN_BY_ID: &str =
    "SELECT id, email, password_hash, name, created_at FROM admin_users WHERE id = $1";

pub const INSERT_ADMIN: &str = r#"
    INSERT INTO admin_users (id, email, password_hash, name)
    VALUES ($1, $2, $3, $4)
    RETURNING id, email, password_hash, name, created_at
"#;
