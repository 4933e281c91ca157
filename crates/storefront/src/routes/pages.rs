//! HTML page shells.
//!
//! Each page renders the shared layout with the request's CSP nonce; the
//! browser scripts fill the page from the JSON API.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::Path, response::IntoResponse};

use crate::middleware::{CspNonce, OptionalAuth};

/// Navigation state shared by every page.
pub struct Shell {
    pub nonce: String,
    /// Page key, exposed to scripts as `data-page`.
    pub page: &'static str,
    pub title: &'static str,
    pub user: Option<String>,
}

impl Shell {
    fn new(nonce: &CspNonce, auth: OptionalAuth, page: &'static str, title: &'static str) -> Self {
        Self {
            nonce: nonce.value().to_owned(),
            page,
            title,
            user: auth.0.map(|u| u.email.into_inner()),
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub shell: Shell,
}

/// Shop listing template.
#[derive(Template, WebTemplate)]
#[template(path = "shop.html")]
pub struct ShopTemplate {
    pub shell: Shell,
}

/// Product detail template.
#[derive(Template, WebTemplate)]
#[template(path = "product.html")]
pub struct ProductTemplate {
    pub shell: Shell,
    pub product_id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart.html")]
pub struct CartTemplate {
    pub shell: Shell,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout.html")]
pub struct CheckoutTemplate {
    pub shell: Shell,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub shell: Shell,
}

/// Signup page template.
#[derive(Template, WebTemplate)]
#[template(path = "signup.html")]
pub struct SignupTemplate {
    pub shell: Shell,
}

/// Account page template.
#[derive(Template, WebTemplate)]
#[template(path = "account.html")]
pub struct AccountTemplate {
    pub shell: Shell,
}

/// Admin dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin.html")]
pub struct AdminTemplate {
    pub shell: Shell,
}

pub async fn index(nonce: CspNonce, auth: OptionalAuth) -> impl IntoResponse {
    IndexTemplate {
        shell: Shell::new(&nonce, auth, "home", "Atelier"),
    }
}

pub async fn shop(nonce: CspNonce, auth: OptionalAuth) -> impl IntoResponse {
    ShopTemplate {
        shell: Shell::new(&nonce, auth, "shop", "Shop"),
    }
}

/// The id is handed to the page as-is; an unknown id renders the page's
/// own not-found state from the API's 404.
pub async fn product(
    nonce: CspNonce,
    auth: OptionalAuth,
    Path(product_id): Path<String>,
) -> impl IntoResponse {
    ProductTemplate {
        shell: Shell::new(&nonce, auth, "product", "Product"),
        product_id,
    }
}

pub async fn cart(nonce: CspNonce, auth: OptionalAuth) -> impl IntoResponse {
    CartTemplate {
        shell: Shell::new(&nonce, auth, "cart", "Cart"),
    }
}

pub async fn checkout(nonce: CspNonce, auth: OptionalAuth) -> impl IntoResponse {
    CheckoutTemplate {
        shell: Shell::new(&nonce, auth, "checkout", "Checkout"),
    }
}

pub async fn login(nonce: CspNonce, auth: OptionalAuth) -> impl IntoResponse {
    LoginTemplate {
        shell: Shell::new(&nonce, auth, "login", "Log in"),
    }
}

pub async fn signup(nonce: CspNonce, auth: OptionalAuth) -> impl IntoResponse {
    SignupTemplate {
        shell: Shell::new(&nonce, auth, "signup", "Create account"),
    }
}

pub async fn account(nonce: CspNonce, auth: OptionalAuth) -> impl IntoResponse {
    AccountTemplate {
        shell: Shell::new(&nonce, auth, "account", "Account"),
    }
}

pub async fn admin(nonce: CspNonce, auth: OptionalAuth) -> impl IntoResponse {
    AdminTemplate {
        shell: Shell::new(&nonce, auth, "admin", "Admin"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn shell(page: &'static str) -> Shell {
        Shell {
            nonce: "bm9uY2U=".to_string(),
            page,
            title: "Test",
            user: None,
        }
    }

    #[test]
    fn test_layout_carries_nonce_and_page() {
        let html = IndexTemplate {
            shell: shell("home"),
        }
        .render()
        .unwrap();

        assert!(html.contains(r#"nonce="bm9uY2U=""#));
        assert!(html.contains(r#"data-page="home""#));
    }

    #[test]
    fn test_product_id_is_escaped() {
        let html = ProductTemplate {
            shell: shell("product"),
            product_id: "<script>".to_string(),
        }
        .render()
        .unwrap();

        assert!(html.contains("&#60;script&#62;") || html.contains("&lt;script&gt;"));
        assert!(!html.contains("data-product-id=\"<script>\""));
    }
}
