//! # Observability 基盤
//!
//! トレーシング初期化・ログ出力形式・相関 ID の設定を提供する。
//! 環境変数 `LOG_FORMAT` による JSON / Pretty 出力の切り替えに対応する。
//!
//! ## 相関 ID
//!
//! リクエストヘッダー `X-Correlation-Id` を相関 ID として使用する。
//! クライアントが付与した値はそのまま再利用し、無ければ
//! [`MakeRequestUuidV7`] が UUID v7 を採番する。レスポンスには常に
//! 同じヘッダーで返送される。

/// ログ出力形式
///
/// 環境変数 `LOG_FORMAT` で切り替える。
/// 値が未設定または不正な場合は [`Pretty`](LogFormat::Pretty) にフォールバックする。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// JSON 形式（本番環境向け）
    Json,
    /// 人間が読みやすい形式（開発環境向け）
    #[default]
    Pretty,
}

impl LogFormat {
    /// 文字列からログ形式をパースする
    ///
    /// 不正な値の場合は [`Pretty`](LogFormat::Pretty) にフォールバックし、
    /// stderr に警告を出力する。
    pub fn parse(s: &str) -> Self {
        match s {
            "json" => Self::Json,
            "pretty" => Self::Pretty,
            other => {
                eprintln!("WARNING: unknown LOG_FORMAT={other:?}, falling back to pretty");
                Self::Pretty
            }
        }
    }

    /// 環境変数 `LOG_FORMAT` から読み取る
    ///
    /// 未設定の場合は [`Pretty`](LogFormat::Pretty) をデフォルトとする。
    pub fn from_env() -> Self {
        match std::env::var("LOG_FORMAT") {
            Ok(val) => Self::parse(&val),
            Err(_) => Self::default(),
        }
    }
}

/// トレーシング初期化設定
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// サービス名（JSON ログの `span.service` フィールドに出力）
    pub service_name: String,
    /// ログ出力形式
    pub log_format:   LogFormat,
}

impl TracingConfig {
    /// 新しい設定を作成する
    pub fn new(service_name: impl Into<String>, log_format: LogFormat) -> Self {
        Self {
            service_name: service_name.into(),
            log_format,
        }
    }

    /// 環境変数から設定を読み取る
    ///
    /// `LOG_FORMAT` 環境変数で出力形式を決定する。
    pub fn from_env(service_name: impl Into<String>) -> Self {
        Self::new(service_name, LogFormat::from_env())
    }
}

/// トレーシングを初期化する
///
/// `RUST_LOG` 環境変数でログレベルを制御可能。
/// 未設定の場合は `"info,itemflow=debug"` をデフォルトとする。
///
/// プロセス起動時に一度だけ呼び出す。以降のログ出力はすべて
/// ここで登録した subscriber に同期的に書き込まれる。
#[cfg(feature = "observability")]
pub fn init_tracing(config: TracingConfig) {
    use tracing_subscriber::{Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,itemflow=debug".into());

    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_target(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

/// 相関 ID のヘッダー名
#[cfg(feature = "observability")]
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

/// 相関 ID ヘッダー名を `HeaderName` として取得する
///
/// `SetRequestIdLayer::new` / `PropagateRequestIdLayer::new` に渡す用。
#[cfg(feature = "observability")]
pub fn correlation_id_header() -> http::HeaderName {
    http::HeaderName::from_static(CORRELATION_ID_HEADER)
}

/// UUID v7 で相関 ID を採番する `MakeRequestId` 実装
///
/// UUID v7 は時刻順にソート可能なため、ログ基盤での検索・照合に都合がよい。
/// クライアントがヘッダーを付与済みの場合、`SetRequestIdLayer` はこの実装を
/// 呼ばずその値を使用する。
#[cfg(feature = "observability")]
#[derive(Clone, Copy, Debug)]
pub struct MakeRequestUuidV7;

#[cfg(feature = "observability")]
impl tower_http::request_id::MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(
        &mut self,
        _request: &http::Request<B>,
    ) -> Option<tower_http::request_id::RequestId> {
        let id = uuid::Uuid::now_v7().to_string();
        http::HeaderValue::from_str(&id)
            .ok()
            .map(tower_http::request_id::RequestId::new)
    }
}

/// リクエストスコープのスパンを構築する
///
/// `TraceLayer::make_span_with` に渡し、相関 ID・メソッド・パスを
/// スパンフィールドとして全ログに自動注入する。相関 ID は
/// `SetRequestIdLayer` がリクエスト extensions に設定した値を参照する。
#[cfg(feature = "observability")]
pub fn make_request_span<B>(request: &http::Request<B>) -> tracing::Span {
    let correlation_id = request
        .extensions()
        .get::<tower_http::request_id::RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
        .unwrap_or("-")
        .to_string();

    tracing::info_span!(
        "request",
        correlation_id = %correlation_id,
        http.method = %request.method(),
        http.path = %request.uri().path(),
    )
}


#[cfg(all(test, feature = "observability"))]
mod observability_tests {
    use tower_http::request_id::MakeRequestId as _;

    use super::*;

    #[test]
    fn test_make_request_idがuuid_v7を採番する() {
        let request = http::Request::builder().body(()).unwrap();
        let id = MakeRequestUuidV7
            .make_request_id(&request)
            .expect("相関 ID が採番されること");

        let uuid = uuid::Uuid::parse_str(id.header_value().to_str().unwrap()).unwrap();
        assert_eq!(uuid.get_version(), Some(uuid::Version::SortRand));
    }

    #[test]
    fn test_correlation_id_headerがヘッダー名を返す() {
        assert_eq!(correlation_id_header().as_str(), "x-correlation-id");
    }
}
