//! Fixed paths and file contents written by the provisioning plan.
//!
//! Contents are literal strings, not templates. Multi-line blocks start
//! with a newline and end with one.

/// Loopback port Apache listens on behind NGINX.
pub const BACKEND_PORT: u16 = 8080;

/// Application install root.
pub const APP_ROOT: &str = "/srv/laravel";

/// Directory Apache serves.
pub const APP_PUBLIC_DIR: &str = "/srv/laravel/public";

/// Directories the application must be able to write to.
pub const APP_WRITABLE_DIRS: &[&str] = &["/srv/laravel/storage", "/srv/laravel/bootstrap/cache"];

/// Application bundle, relative to the working directory. Must exist before the Run.
pub const APP_ARCHIVE: &str = "laravel_app.zip";

/// User and group Apache runs as.
pub const APP_OWNER: &str = "apache";

/// Value applied to `vm.swappiness`.
pub const SWAPPINESS: u8 = 10;

// ============================================================================
// NGINX reverse proxy
// ============================================================================

pub const NGINX_SITE_PATH: &str = "/etc/nginx/conf.d/laravel.conf";

pub const NGINX_SITE_CONF: &str = r#"
server {
    listen 80;
    server_name yourdomain.com;

    location / {
        proxy_pass http://127.0.0.1:8080;
        proxy_set_header Host $host;
        proxy_set_header X-Real-IP $remote_addr;
        proxy_set_header X-Forwarded-For $proxy_add_x_forwarded_for;
        proxy_set_header X-Forwarded-Proto $scheme;
    }

    location ~ \.php$ {
        return 404;
    }

    gzip on;
    gzip_types text/plain text/css application/json application/javascript text/xml application/xml application/xml+rss text/javascript;
    gzip_proxied any;
}
"#;

// ============================================================================
// Apache virtual host
// ============================================================================

pub const HTTPD_VHOST_PATH: &str = "/etc/httpd/conf.d/laravel.conf";

pub const HTTPD_VHOST_CONF: &str = r#"
<VirtualHost *:8080>
    DocumentRoot "/srv/laravel/public"
    <Directory "/srv/laravel/public">
        AllowOverride All
        Require all granted
    </Directory>
</VirtualHost>
"#;

pub const HTTPD_GZIP_PATH: &str = "/etc/httpd/conf.d/gzip.conf";

pub const HTTPD_GZIP_CONF: &str = r#"
<IfModule mod_deflate.c>
    AddOutputFilterByType DEFLATE text/html text/plain text/xml text/css application/javascript application/json
</IfModule>
"#;

// ============================================================================
// Kernel and memory
// ============================================================================

pub const SWAPPINESS_PATH: &str = "/etc/sysctl.d/99-swappiness.conf";

pub const SWAPPINESS_CONF: &str = "vm.swappiness=10\n";

pub const ZRAM_GENERATOR_PATH: &str = "/etc/systemd/zram-generator.conf";

pub const ZRAM_GENERATOR_CONF: &str = r#"
[zram0]
zram-size = ram / 2
compression-algorithm = zstd
"#;

/// Every file the plan writes, in plan order.
pub const ALL_PATHS: &[&str] = &[
    NGINX_SITE_PATH,
    HTTPD_VHOST_PATH,
    SWAPPINESS_PATH,
    ZRAM_GENERATOR_PATH,
    HTTPD_GZIP_PATH,
];
