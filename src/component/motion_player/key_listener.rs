use console::{Key, Term, style};
use log::debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::thread;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Quit,
    Skip,
    Pause,
    Other,
}

impl From<Key> for KeyCommand {
    fn from(key: Key) -> Self {
        match key {
            Key::Char('q' | 'Q') | Key::Escape => Self::Quit,
            Key::Char('n' | 'N') => Self::Skip,
            Key::Char(' ' | 'p' | 'P') => Self::Pause,
            _ => Self::Other,
        }
    }
}

/// 在背景執行緒讀取按鍵，透過 channel 交給播放迴圈
pub struct KeyListener {
    stop: Arc<AtomicBool>,
    receiver: Receiver<KeyCommand>,
}

impl KeyListener {
    #[must_use]
    pub fn spawn() -> Self {
        let (sender, receiver) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let stop_clone = Arc::clone(&stop);

        thread::spawn(move || {
            let term = Term::stdout();
            loop {
                let Ok(key) = term.read_key() else {
                    debug!("無法讀取按鍵，停止監聽");
                    break;
                };
                if sender.send(KeyCommand::from(key)).is_err()
                    || stop_clone.load(Ordering::SeqCst)
                {
                    break;
                }
            }
        });

        Self { stop, receiver }
    }

    #[must_use]
    pub const fn receiver(&self) -> &Receiver<KeyCommand> {
        &self.receiver
    }

    /// 監聽執行緒會卡在讀鍵，請使用者再按一次鍵讓它結束，
    /// 避免它搶走之後選單的輸入
    pub fn finish(self) {
        self.stop.store(true, Ordering::SeqCst);
        while self.receiver.try_recv().is_ok() {}
        println!("\n{}", style("按任意鍵返回...").dim());
        let _ = self.receiver.recv();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(KeyCommand::from(Key::Char('q')), KeyCommand::Quit);
        assert_eq!(KeyCommand::from(Key::Escape), KeyCommand::Quit);
        assert_eq!(KeyCommand::from(Key::Char('n')), KeyCommand::Skip);
        assert_eq!(KeyCommand::from(Key::Char(' ')), KeyCommand::Pause);
        assert_eq!(KeyCommand::from(Key::Char('p')), KeyCommand::Pause);
        assert_eq!(KeyCommand::from(Key::Char('x')), KeyCommand::Other);
        assert_eq!(KeyCommand::from(Key::Enter), KeyCommand::Other);
    }
}
