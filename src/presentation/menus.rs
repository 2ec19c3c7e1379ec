use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::Result;
use indicatif::ProgressBar;

use crate::application::Config;
use crate::domain::search::search_spinner;
use crate::domain::{NameSearcher, Paginator, SearchReport, SearchResultEntry};
use crate::infrastructure::{ErrorLogger, Logger, LoggerTrait, SearchInterrupt};
use crate::presentation::console::{Console, Prompt};
use crate::presentation::display;

/// 主菜单选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainMenuChoice {
    Search,
    ViewSettings,
    EditSettings,
    Exit,
}

impl MainMenuChoice {
    pub fn from_number(number: u32) -> Option<Self> {
        match number {
            1 => Some(Self::Search),
            2 => Some(Self::ViewSettings),
            3 => Some(Self::EditSettings),
            4 => Some(Self::Exit),
            _ => None,
        }
    }
}

/// 翻页菜单命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageCommand {
    Next,
    Previous,
    MainMenu,
}

impl PageCommand {
    pub fn parse(input: &str) -> Option<Self> {
        match input.to_ascii_lowercase().as_str() {
            "n" => Some(Self::Next),
            "p" => Some(Self::Previous),
            "m" => Some(Self::MainMenu),
            _ => None,
        }
    }
}

/// 交互式会话
pub struct App<R, W> {
    config: Config,
    console: Console<R, W>,
    logger: Arc<dyn LoggerTrait>,
    error_logger: Arc<ErrorLogger>,
    interrupt: SearchInterrupt,
    show_progress: bool,
}

impl<R: BufRead, W: Write> App<R, W> {
    pub fn new(config: Config, console: Console<R, W>) -> Self {
        Self {
            config,
            console,
            logger: Arc::new(Logger::disabled()),
            error_logger: Arc::new(ErrorLogger::disabled()),
            interrupt: SearchInterrupt::new(),
            show_progress: false,
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn LoggerTrait>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_error_logger(mut self, error_logger: Arc<ErrorLogger>) -> Self {
        self.error_logger = error_logger;
        self
    }

    pub fn with_interrupt(mut self, interrupt: SearchInterrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    /// 搜索时是否显示进度指示器
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn into_console(self) -> Console<R, W> {
        self.console
    }

    /// 主菜单循环，选择退出或取消时返回
    pub fn run(&mut self) -> Result<()> {
        loop {
            let out = self.console.output();
            writeln!(out, "\n=== File Finder Main Menu ===")?;
            writeln!(out, "1. Search for a File/Folder")?;
            writeln!(out, "2. View Current Settings")?;
            writeln!(out, "3. Edit Settings")?;
            writeln!(out, "4. Exit")?;

            let input = match self.console.read_input("Choose an option: ")? {
                Prompt::Value(input) => input,
                Prompt::Cancelled => break,
            };

            let number: u32 = match input.parse() {
                Ok(number) => number,
                Err(_) => {
                    writeln!(self.console.output(), "⚠️ Invalid input! Enter a number.")?;
                    continue;
                }
            };

            match MainMenuChoice::from_number(number) {
                Some(MainMenuChoice::Search) => self.search_menu()?,
                Some(MainMenuChoice::ViewSettings) => self.view_settings_menu()?,
                Some(MainMenuChoice::EditSettings) => self.edit_settings_menu()?,
                Some(MainMenuChoice::Exit) => break,
                None => {
                    writeln!(
                        self.console.output(),
                        "⚠️ Invalid choice. Please select a number from 1 to 4."
                    )?;
                }
            }
        }

        writeln!(self.console.output(), "Goodbye!")?;
        Ok(())
    }

    /// 查询、搜索、然后进入搜索后菜单
    fn search_menu(&mut self) -> Result<()> {
        'search: loop {
            let query = match self.console.read_input("Enter file or folder name: ")? {
                Prompt::Value(query) => query,
                Prompt::Cancelled => return Ok(()),
            };

            let report = self.run_search(&query)?;
            display::print_search_summary(self.console.output(), &report)?;
            if report.cancelled {
                return Ok(());
            }
            self.error_logger.write_error_summary(self.console.output())?;

            loop {
                let out = self.console.output();
                writeln!(out, "\nWhat would you like to do?")?;
                writeln!(out, "1. View results")?;
                writeln!(out, "2. Search again")?;
                writeln!(out, "3. Return to Main Menu")?;

                let choice = match self.console.read_input("Enter choice: ")? {
                    Prompt::Value(choice) => choice,
                    Prompt::Cancelled => return Ok(()),
                };

                match choice.as_str() {
                    "1" if report.results.is_empty() => {
                        writeln!(self.console.output(), "\nNo results found.")?;
                    }
                    "1" => return self.browse_results(&report.results),
                    "2" => continue 'search,
                    "3" => return Ok(()),
                    _ => {
                        writeln!(
                            self.console.output(),
                            "Invalid option. Please choose 1, 2, or 3."
                        )?;
                    }
                }
            }
        }
    }

    fn run_search(&mut self, query: &str) -> Result<SearchReport> {
        display::print_search_banner(self.console.output(), &self.config, query)?;
        self.console.output().flush()?;

        self.error_logger.reset_counts();
        let progress = if self.show_progress {
            search_spinner()
        } else {
            ProgressBar::hidden()
        };

        let _guard = self.interrupt.begin_search();
        let report = NameSearcher::new(&self.config)
            .with_logger(Arc::clone(&self.logger))
            .with_error_logger(Arc::clone(&self.error_logger))
            .with_progress(progress)
            .with_cancel_flag(self.interrupt.cancel_flag())
            .run(query);

        Ok(report)
    }

    /// 分页浏览结果，页大小在进入时固定
    fn browse_results(&mut self, results: &[SearchResultEntry]) -> Result<()> {
        let mut paginator = Paginator::new(results.len(), self.config.display_size());

        loop {
            display::print_page(self.console.output(), &paginator, results)?;

            let input = match self.console.read_input("Enter choice: ")? {
                Prompt::Value(input) => input,
                Prompt::Cancelled => return Ok(()),
            };

            let moved = match PageCommand::parse(&input) {
                Some(PageCommand::MainMenu) => return Ok(()),
                Some(PageCommand::Next) => paginator.next().is_ok(),
                Some(PageCommand::Previous) => paginator.previous().is_ok(),
                None => false,
            };

            if !moved {
                writeln!(self.console.output(), "Invalid option. Try again.")?;
            }
        }
    }

    fn view_settings_menu(&mut self) -> Result<()> {
        loop {
            let out = self.console.output();
            writeln!(out, "\n--- View Current Settings ---")?;
            writeln!(out, "1. Search Folder")?;
            writeln!(out, "2. Search Display Size")?;
            writeln!(out, "3. Case Sensitive")?;
            writeln!(out, "4. Return to Main Menu")?;

            let choice = match self.read_menu_number()? {
                Prompt::Value(Some(choice)) => choice,
                Prompt::Value(None) => continue,
                Prompt::Cancelled => return Ok(()),
            };

            let out = self.console.output();
            match choice {
                1 => {
                    writeln!(out, "\n🔎 Search Folder:")?;
                    writeln!(out, "   {}", self.config.root_path().display())?;
                }
                2 => {
                    writeln!(out, "\n📄 Search Display Size:")?;
                    writeln!(out, "   {}", self.config.display_size())?;
                }
                3 => {
                    writeln!(out, "\n🔠 Case Sensitive:")?;
                    writeln!(out, "   {}", self.config.case_sensitive())?;
                }
                4 => return Ok(()),
                _ => writeln!(out, "⚠️ Invalid menu choice! Please select 1-4.")?,
            }
        }
    }

    fn edit_settings_menu(&mut self) -> Result<()> {
        loop {
            let out = self.console.output();
            writeln!(out, "\n--- Edit Settings ---")?;
            writeln!(out, "1. Change Root Path")?;
            writeln!(out, "2. Change Display Size")?;
            writeln!(out, "3. Toggle Case Sensitivity")?;
            writeln!(out, "4. Back to Main Menu")?;

            let choice = match self.read_menu_number()? {
                Prompt::Value(Some(choice)) => choice,
                Prompt::Value(None) => continue,
                Prompt::Cancelled => return Ok(()),
            };

            match choice {
                1 => self.edit_root_path()?,
                2 => self.edit_display_size()?,
                3 => self.edit_case_sensitivity()?,
                4 => return Ok(()),
                _ => writeln!(
                    self.console.output(),
                    "⚠️ Invalid menu choice! Please select 1-4."
                )?,
            }
        }
    }

    /// 读取子菜单编号，非数字时提示并返回 `Value(None)`
    fn read_menu_number(&mut self) -> Result<Prompt<Option<u32>>> {
        let input = match self.console.read_input("Choose an option: ")? {
            Prompt::Value(input) => input,
            Prompt::Cancelled => return Ok(Prompt::Cancelled),
        };

        match input.parse() {
            Ok(number) => Ok(Prompt::Value(Some(number))),
            Err(_) => {
                writeln!(
                    self.console.output(),
                    "⚠️ Invalid menu choice! Please enter a number 1-4."
                )?;
                Ok(Prompt::Value(None))
            }
        }
    }

    fn edit_root_path(&mut self) -> Result<()> {
        writeln!(
            self.console.output(),
            "\nCurrent Root Path: {}",
            self.config.root_path().display()
        )?;

        loop {
            let path = match self.console.read_input("Enter new root path: ")? {
                Prompt::Value(path) => path,
                Prompt::Cancelled => return Ok(()),
            };

            match self.config.set_root_path(&path) {
                Ok(()) => {
                    let root = self.config.root_path().display().to_string();
                    let _ = self.logger.log_message(&format!("Root path set to {}", root));

                    let out = self.console.output();
                    writeln!(out, "\n✔️ Root Path updated successfully!")?;
                    writeln!(out, "   New Root Path: {}", root)?;
                    return Ok(());
                }
                Err(err) => {
                    writeln!(self.console.output(), "⚠️ {}. Try again.", err)?;
                }
            }
        }
    }

    fn edit_display_size(&mut self) -> Result<()> {
        writeln!(
            self.console.output(),
            "\nCurrent Display Size: {}",
            self.config.display_size()
        )?;

        loop {
            let input = match self.console.read_input("Enter new display size (3-20): ")? {
                Prompt::Value(input) => input,
                Prompt::Cancelled => return Ok(()),
            };

            let size: usize = match input.parse() {
                Ok(size) => size,
                Err(_) => {
                    writeln!(
                        self.console.output(),
                        "⚠️ Invalid input! Please enter a valid number."
                    )?;
                    continue;
                }
            };

            match self.config.set_display_size(size) {
                Ok(()) => {
                    let _ = self.logger.log_message(&format!("Display size set to {}", size));

                    let out = self.console.output();
                    writeln!(out, "\n✔️ Display Size updated successfully!")?;
                    writeln!(out, "   New Display Size: {}", self.config.display_size())?;
                    return Ok(());
                }
                Err(err) => {
                    writeln!(self.console.output(), "⚠️ Invalid input! {}.", err)?;
                }
            }
        }
    }

    fn edit_case_sensitivity(&mut self) -> Result<()> {
        writeln!(
            self.console.output(),
            "\nCase Sensitive (current): {}",
            self.config.case_sensitive()
        )?;

        loop {
            let out = self.console.output();
            writeln!(out, "Do you want to change this?")?;
            writeln!(out, "1. Yes")?;
            writeln!(out, "2. No")?;

            let confirm = match self.console.read_input("Choose an option: ")? {
                Prompt::Value(confirm) => confirm,
                Prompt::Cancelled => return Ok(()),
            };

            match confirm.as_str() {
                "1" => {
                    let case_sensitive = self.config.toggle_case_sensitive();
                    let _ = self
                        .logger
                        .log_message(&format!("Case sensitivity set to {}", case_sensitive));

                    let out = self.console.output();
                    writeln!(out, "\n✔️ Case Sensitivity updated successfully!")?;
                    writeln!(out, "   Case Sensitive (new): {}", case_sensitive)?;
                    return Ok(());
                }
                "2" => {
                    writeln!(self.console.output(), "\nNo changes made to Case Sensitivity.")?;
                    return Ok(());
                }
                _ => {
                    writeln!(
                        self.console.output(),
                        "⚠️ Invalid input! Please enter 1 or 2."
                    )?;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::{tempdir, TempDir};

    type TestApp = App<Cursor<Vec<u8>>, Vec<u8>>;

    fn app(config: Config, script: &str) -> TestApp {
        let console = Console::new(Cursor::new(script.as_bytes().to_vec()), Vec::new());
        App::new(config, console)
    }

    fn output(app: TestApp) -> String {
        let (_, output) = app.into_console().into_parts();
        String::from_utf8(output).unwrap()
    }

    /// 七个名称含 "item" 的文件
    fn seven_items() -> (TempDir, Config) {
        let temp_dir = tempdir().unwrap();
        for i in 1..=7 {
            fs::write(temp_dir.path().join(format!("item{}.txt", i)), "").unwrap();
        }
        let mut config = Config::with_root(temp_dir.path()).unwrap();
        config.set_display_size(3).unwrap();
        (temp_dir, config)
    }

    #[test]
    fn test_menu_choice_parsing() {
        assert_eq!(MainMenuChoice::from_number(1), Some(MainMenuChoice::Search));
        assert_eq!(MainMenuChoice::from_number(4), Some(MainMenuChoice::Exit));
        assert_eq!(MainMenuChoice::from_number(0), None);
        assert_eq!(MainMenuChoice::from_number(5), None);

        assert_eq!(PageCommand::parse("N"), Some(PageCommand::Next));
        assert_eq!(PageCommand::parse("p"), Some(PageCommand::Previous));
        assert_eq!(PageCommand::parse("m"), Some(PageCommand::MainMenu));
        assert_eq!(PageCommand::parse("next"), None);
    }

    #[test]
    fn test_non_utf8_input_does_not_end_session() {
        let (temp_dir, config) = seven_items();
        // 非 UTF-8 的查询、路径、子菜单和主菜单输入
        let mut script = b"1\ncaf\xe9\n3\n3\n1\n".to_vec();
        script.extend_from_slice(temp_dir.path().to_string_lossy().as_bytes());
        script.extend_from_slice(b"/\xe9t\xe9\nq\n\xff\n4\n\xe9\n4\n");

        let console = Console::new(Cursor::new(script), Vec::new());
        let mut session = App::new(config.clone(), console);
        session.run().unwrap();

        assert_eq!(session.config(), &config);
        let text = output(session);
        assert!(text.contains("Found 0 results"));
        assert!(text.contains("Invalid path"));
        assert!(text.contains("Invalid menu choice! Please enter a number 1-4."));
        assert!(text.contains("Invalid input! Enter a number."));
        assert!(text.contains("Goodbye!"));
    }

    #[test]
    fn test_exit_and_quit_leave_main_menu() {
        let mut session = app(Config::default(), "4\n");
        session.run().unwrap();
        assert!(output(session).contains("Goodbye!"));

        let mut session = app(Config::default(), "QUIT\n");
        session.run().unwrap();
        assert!(output(session).contains("Goodbye!"));
    }

    #[test]
    fn test_malformed_main_menu_input_reprompts() {
        let mut session = app(Config::default(), "abc\n9\n4\n");
        session.run().unwrap();

        let text = output(session);
        assert!(text.contains("Invalid input! Enter a number."));
        assert!(text.contains("Invalid choice."));
        assert_eq!(text.matches("=== File Finder Main Menu ===").count(), 3);
    }

    #[test]
    fn test_end_of_input_ends_session() {
        let mut session = app(Config::default(), "3\n");
        session.run().unwrap();
        assert!(output(session).contains("Goodbye!"));
    }

    #[test]
    fn test_edit_settings_validates_and_updates() {
        let temp_dir = tempdir().unwrap();
        let missing = temp_dir.path().join("missing");
        let script = format!(
            "3\n1\n{}\n{}\n2\nabc\n25\n5\n3\n7\n1\n4\n4\n",
            missing.display(),
            temp_dir.path().display()
        );

        let mut session = app(Config::default(), &script);
        session.run().unwrap();

        assert_eq!(session.config().root_path(), temp_dir.path().canonicalize().unwrap());
        assert_eq!(session.config().display_size(), 5);
        assert!(!session.config().case_sensitive());

        let text = output(session);
        assert!(text.contains("Invalid path"));
        assert!(text.contains("Root Path updated successfully!"));
        assert!(text.contains("Please enter a valid number."));
        assert!(text.contains("Display size must be between 3 and 20"));
        assert!(text.contains("Please enter 1 or 2."));
        assert!(text.contains("Case Sensitive (new): false"));
    }

    #[test]
    fn test_cancel_inside_edit_keeps_config() {
        let config = Config::default();
        let mut session = app(config.clone(), "3\n2\nq\n1\nquit\n4\n4\n");
        session.run().unwrap();
        assert_eq!(session.config(), &config);
    }

    #[test]
    fn test_view_settings() {
        let (temp_dir, config) = seven_items();
        let mut session = app(config, "2\n1\n2\n3\nx\n4\n4\n");
        session.run().unwrap();

        let text = output(session);
        let root = temp_dir.path().canonicalize().unwrap();
        assert!(text.contains(&format!("   {}", root.display())));
        assert!(text.contains("📄 Search Display Size:\n   3"));
        assert!(text.contains("🔠 Case Sensitive:\n   true"));
        assert!(text.contains("Please enter a number 1-4."));
    }

    #[test]
    fn test_search_and_browse_pages() {
        let (_temp_dir, config) = seven_items();
        // 搜索，查看结果，翻到第 3 页，再次下一页被拒绝，上一页，回主菜单，退出
        let mut session = app(config, "1\nitem\n1\nn\nN\nn\np\nx\nm\n4\n");
        session.run().unwrap();

        let text = output(session);
        assert!(text.contains("Found 7 results"));
        assert!(text.contains("--- Results Page 1 of 3 ---"));
        assert!(text.contains("--- Results Page 3 of 3 ---"));
        assert!(text.contains("7. "));
        assert_eq!(text.matches("Invalid option. Try again.").count(), 2);
        // 下一页、上一页、无效输入各显示一次第 2 页
        assert_eq!(text.matches("--- Results Page 2 of 3 ---").count(), 3);
    }

    #[test]
    fn test_previous_on_first_page_is_rejected() {
        let (_temp_dir, config) = seven_items();
        let mut session = app(config, "1\nitem\n1\np\nq\n4\n");
        session.run().unwrap();

        let text = output(session);
        assert_eq!(text.matches("--- Results Page 1 of 3 ---").count(), 2);
        assert!(text.contains("Invalid option. Try again."));
    }

    #[test]
    fn test_empty_results_stay_in_post_search_menu() {
        let (_temp_dir, config) = seven_items();
        let mut session = app(config, "1\nnothing-matches\n1\n2\nitem7\n3\n4\n");
        session.run().unwrap();

        let text = output(session);
        assert!(text.contains("Found 0 results"));
        assert!(text.contains("No results found."));
        assert!(!text.contains("--- Results Page"));
        assert!(text.contains("Found 1 results"));
    }

    #[test]
    fn test_invalid_post_search_choice() {
        let (_temp_dir, config) = seven_items();
        let mut session = app(config, "1\nitem\n7\nq\n4\n");
        session.run().unwrap();
        assert!(output(session).contains("Invalid option. Please choose 1, 2, or 3."));
    }

    #[test]
    fn test_search_uses_edited_case_sensitivity() {
        let (_temp_dir, config) = seven_items();
        let mut session = app(config, "1\nITEM\n3\n3\n3\n1\n4\n1\nITEM\n3\n4\n");
        session.run().unwrap();

        let text = output(session);
        assert!(text.contains("Found 0 results"));
        assert!(text.contains("Found 7 results"));
    }
}
