//! Minimal HTTP stub serving canned JSON responses for client tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Canned response for one method + path
pub struct Route {
    pub method: &'static str,
    pub path: &'static str,
    pub status: u16,
    pub body: String,
}

impl Route {
    pub fn get(path: &'static str, body: &str) -> Self {
        Self::new("GET", path, 200, body)
    }

    pub fn new(method: &'static str, path: &'static str, status: u16, body: &str) -> Self {
        Self {
            method,
            path,
            status,
            body: body.to_string(),
        }
    }
}

/// A request as received by the stub
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub target: String,
    pub body: String,
}

impl RecordedRequest {
    pub fn path(&self) -> &str {
        self.target.split('?').next().unwrap_or_default()
    }

    pub fn query(&self) -> &str {
        self.target.split_once('?').map(|(_, q)| q).unwrap_or_default()
    }
}

pub struct MockServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockServer {
    pub async fn start(routes: Vec<Route>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let routes = Arc::new(routes);

        let recorded = requests.clone();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let routes = routes.clone();
                let recorded = recorded.clone();
                tokio::spawn(async move {
                    let Some(request) = read_request(&mut socket).await else {
                        return;
                    };
                    let (status, body) = routes
                        .iter()
                        .find(|r| r.method == request.method && r.path == request.path())
                        .map(|r| (r.status, r.body.clone()))
                        .unwrap_or((404, r#"{"detail":"Not Found"}"#.to_string()));
                    recorded.lock().unwrap().push(request);

                    let response = format!(
                        "HTTP/1.1 {status} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        reason(status),
                        body.len()
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        400 => "Bad Request",
        404 => "Not Found",
        422 => "Unprocessable Entity",
        _ => "Internal Server Error",
    }
}

async fn read_request(socket: &mut TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let mut request_line = head.lines().next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let target = request_line.next()?.to_string();
    let body = String::from_utf8_lossy(&buf[header_end..]).to_string();

    Some(RecordedRequest {
        method,
        target,
        body,
    })
}

pub const STATS_JSON: &str = r#"{
    "total_productos": 3,
    "total_tiendas": 3,
    "total_categorias": 2,
    "total_alertas_activas": 1,
    "ultimo_scraping": "2024-06-01T06:00:00",
    "productos_por_tienda": {"Wong": 3, "Metro": 2},
    "productos_por_categoria": {"Lácteos": 2}
}"#;

pub const PRODUCTS_JSON: &str = r#"[
    {"id": 1, "nombre": "Leche Gloria Azul", "marca": "Gloria", "categoria": "Lácteos",
     "fecha_creacion": "2024-05-01T10:00:00", "ultima_actualizacion": "2024-06-01T06:00:00"},
    {"id": 2, "nombre": "Yogurt Laive", "marca": null, "categoria": "Lácteos",
     "fecha_creacion": "2024-05-01T10:00:00", "ultima_actualizacion": "2024-06-01T06:00:00"}
]"#;

pub const CATEGORIES_JSON: &str =
    r#"[{"id": 1, "nombre": "Lácteos", "activa": true}, {"id": 2, "nombre": "Limpieza", "activa": true}]"#;

pub const BRANDS_JSON: &str = r#"[{"id": 1, "nombre": "Gloria"}, {"id": 2, "nombre": "Laive"}]"#;

pub const DETAIL_JSON: &str = r#"{
    "id": 1,
    "nombre": "Leche Gloria Azul",
    "marca": "Gloria",
    "categoria": "Lácteos",
    "precios_actuales": [
        {"id": 10, "precio": 4.5, "tienda": "Wong", "stock": 20, "url": "https://wong.pe/leche", "fecha": "2024-06-01T06:00:00"},
        {"id": 11, "precio": 4.2, "tienda": "Metro", "stock": null, "url": "https://metro.pe/leche", "fecha": "2024-06-01T06:00:00"}
    ]
}"#;

pub const HISTORY_JSON: &str = r#"[
    {"fecha": "2024-06-01T06:00:00", "precio": 4.2, "tienda": "Metro", "variacion_porcentual": -4.55},
    {"fecha": "2024-05-31T06:00:00", "precio": 4.4, "tienda": "Metro", "variacion_porcentual": null}
]"#;

pub const COMPARISON_JSON: &str = r#"{
    "producto_id": 1,
    "producto": "Leche Gloria Azul",
    "marca": "Gloria",
    "categoria": "Lácteos",
    "precio_wong": 4.5,
    "precio_metro": 4.2,
    "precio_plaza_vea": null,
    "precio_minimo": 4.2,
    "precio_maximo": 4.5,
    "mejor_tienda": "Metro",
    "ahorro_maximo": 0.3
}"#;

pub const ALERT_JSON: &str = r#"{
    "id": 5,
    "producto_id": 1,
    "email": "rosa@correo.pe",
    "precio_objetivo": 4.0,
    "activa": true,
    "notificado": false,
    "fecha_creacion": "2024-06-01T12:00:00"
}"#;
