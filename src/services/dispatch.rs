// src/services/dispatch.rs

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

/// Canal de saída de notificações (e-mail, SMS, push...).
///
/// O contrato é de melhor esforço: `send` devolve `true`/`false` em vez
/// de `Result`, porque uma falha de entrega externa nunca derruba a
/// operação de negócio que a originou.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    fn name(&self) -> &'static str;

    async fn send(&self, recipient: &str, subject: &str, body: &str) -> bool;
}

/// Canal padrão: só registra no log. Serve para desenvolvimento e para
/// ambientes sem provedor de e-mail configurado.
pub struct LogChannel;

#[async_trait]
impl NotificationChannel for LogChannel {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn send(&self, recipient: &str, subject: &str, body: &str) -> bool {
        tracing::info!(
            canal = self.name(),
            destinatario = recipient,
            assunto = subject,
            corpo = body,
            "Notificação despachada"
        );
        true
    }
}

/// Resultado agregado de um envio em lote.
#[derive(Debug, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkSendReport {
    pub total: usize,
    pub success_count: usize,
    pub failure_count: usize,
}

impl BulkSendReport {
    pub fn record(&mut self, delivered: bool) {
        self.total += 1;
        if delivered {
            self.success_count += 1;
        } else {
            self.failure_count += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CanalQueFalhaPares {
        contador: std::sync::atomic::AtomicUsize,
    }

    #[async_trait]
    impl NotificationChannel for CanalQueFalhaPares {
        fn name(&self) -> &'static str {
            "teste"
        }

        async fn send(&self, _recipient: &str, _subject: &str, _body: &str) -> bool {
            let n = self
                .contador
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            n % 2 == 0
        }
    }

    #[tokio::test]
    async fn relatorio_de_lote_soma_sucessos_e_falhas() {
        let canal = CanalQueFalhaPares { contador: Default::default() };
        let mut report = BulkSendReport::default();

        for destinatario in ["a@x.com", "b@x.com", "c@x.com"] {
            let ok = canal.send(destinatario, "Assunto", "Corpo").await;
            report.record(ok);
        }

        assert_eq!(report.total, 3);
        assert_eq!(report.success_count, 2);
        assert_eq!(report.failure_count, 1);
    }

    #[tokio::test]
    async fn canal_de_log_sempre_entrega() {
        assert!(LogChannel.send("a@x.com", "Assunto", "Corpo").await);
    }
}
