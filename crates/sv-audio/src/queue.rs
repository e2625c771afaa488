use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use rtrb::{Consumer, Producer, RingBuffer};
use sv_core::block::AudioBlock;

/// Crée la queue de blocs single-producer/single-consumer.
///
/// FIFO borné, lock-free (rtrb). Le producteur ne bloque JAMAIS : un push
/// sur queue pleine jette le bloc entrant et incrémente un compteur de
/// pertes partagé. Le pop est non-bloquant.
///
/// # Example
/// ```
/// use sv_audio::queue::block_queue;
/// use sv_core::block::AudioBlock;
///
/// let (mut tx, mut rx) = block_queue(8);
/// tx.push(AudioBlock::from_samples(vec![0.0; 4]));
/// assert_eq!(rx.pop().unwrap().len(), 4);
/// assert!(rx.pop().is_none());
/// ```
#[must_use]
pub fn block_queue(capacity: usize) -> (BlockProducer, BlockConsumer) {
    let (producer, consumer) = RingBuffer::new(capacity.max(1));
    let dropped = Arc::new(AtomicU64::new(0));
    (
        BlockProducer {
            inner: producer,
            dropped: Arc::clone(&dropped),
        },
        BlockConsumer {
            inner: consumer,
            dropped,
        },
    )
}

/// Côté producteur, détenu par le callback de capture.
pub struct BlockProducer {
    inner: Producer<AudioBlock>,
    dropped: Arc<AtomicU64>,
}

impl BlockProducer {
    /// Enfile un bloc sans jamais bloquer.
    ///
    /// Retourne `false` si la queue était pleine : le bloc est jeté et le
    /// compteur de pertes incrémenté. Le consommateur décide quoi en faire
    /// (log, ligne de statut) — jamais le thread temps réel.
    #[inline(always)]
    pub fn push(&mut self, block: AudioBlock) -> bool {
        match self.inner.push(block) {
            Ok(()) => true,
            Err(rtrb::PushError::Full(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }
}

/// Côté consommateur, détenu par la boucle de rendu.
pub struct BlockConsumer {
    inner: Consumer<AudioBlock>,
    dropped: Arc<AtomicU64>,
}

impl BlockConsumer {
    /// Défile le bloc le plus ancien, `None` si la queue est vide.
    #[inline]
    pub fn pop(&mut self) -> Option<AudioBlock> {
        self.inner.pop().ok()
    }

    /// Vide la queue et retourne le bloc le plus récent.
    ///
    /// C'est la politique fraîcheur-d'abord du rendu : tout retard
    /// accumulé est jeté, seul le dernier bloc capturé est affiché.
    pub fn pop_latest(&mut self) -> Option<AudioBlock> {
        let mut latest = None;
        while let Ok(block) = self.inner.pop() {
            latest = Some(block);
        }
        latest
    }

    /// Nombre de blocs actuellement en attente.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.slots()
    }

    /// `true` si aucun bloc n'est en attente.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.slots() == 0
    }

    /// Total de blocs jetés par le producteur depuis la création.
    #[must_use]
    pub fn dropped_blocks(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}
