/*
 * The Win32 implementation of `ControlSurface`.
 *
 * `Win32Surface` registers the dialog window class once, creates dialog
 * windows and their controls through the handlers in `crate::controls`, and
 * owns the GDI objects each window needs (custom font, background brush,
 * icon, picture-button bitmaps) until the window is destroyed.
 *
 * Keyboard handling is per dialog: instead of a process-wide message hook,
 * the host's message loop offers each message to
 * `Dialog::pre_translate_message`, or simply calls `Dialog::run_message_loop`.
 */
use crate::config::DialogConfig;
use crate::control::{Control, ControlKind, ControlPayload};
use crate::controls::label_handler::LabelKind;
use crate::controls::{
    ChildHost, button_handler, checkbox_handler, combobox_handler, input_handler, label_handler,
    radiobutton_handler, slider_handler, spin_handler, styling_handler,
};
use crate::dialog::{Dialog, NotificationRouter};
use crate::error::{PlatformError, Result as PlatformResult};
use crate::surface::{ChoiceStyle, ControlSurface, CreatedControl};
use crate::types::{ControlId, NativeHandle, Notification};
use crate::window_common::{self, WindowCreationContext, hwnd_of, native_of};

use std::collections::HashMap;
use std::path::Path;
use windows::Win32::{
    Foundation::{GetLastError, HINSTANCE, HWND},
    Graphics::Gdi::{CreateSolidBrush, DeleteObject, HBITMAP, HBRUSH, HFONT, HGDIOBJ, InvalidateRect, UpdateWindow},
    System::LibraryLoader::GetModuleHandleW,
    UI::Controls::{
        ICC_BAR_CLASSES, ICC_STANDARD_CLASSES, ICC_UPDOWN_CLASS, INITCOMMONCONTROLSEX,
        InitCommonControlsEx, SetWindowTheme,
    },
    UI::Input::KeyboardAndMouse::{EnableWindow, VK_RETURN},
    UI::Shell::ShellExecuteW,
    UI::WindowsAndMessaging::{
        DestroyIcon, DispatchMessageW, GetDlgCtrlID, GetMessageW, HICON, IDYES, IMAGE_ICON,
        IsChild, IsDialogMessageW, IsWindow, LR_DEFAULTSIZE, LR_LOADFROMFILE, LoadImageW,
        MB_ICONERROR, MB_ICONQUESTION, MB_OK, MB_YESNO, MSG, MessageBoxW, PostQuitMessage,
        SW_SHOW, SW_SHOWNORMAL, SendMessageW, SetWindowTextW, ShowWindow, TranslateMessage,
        WM_KEYDOWN, WM_KEYUP, WM_SETICON,
    },
};
use windows::core::{HSTRING, PCWSTR, w};

const ICON_SMALL: usize = 0;
const ICON_BIG: usize = 1;

// ShellExecuteW reports success with a value above 32.
const SHELL_EXECUTE_MIN_SUCCESS: isize = 32;

/// GDI objects owned on behalf of one dialog window.
#[derive(Debug, Default)]
struct WindowResources {
    font: Option<HFONT>,
    brush: Option<HBRUSH>,
    icon: Option<HICON>,
    bitmaps: Vec<HBITMAP>,
}

impl WindowResources {
    fn release(self) {
        unsafe {
            if let Some(font) = self.font {
                let _ = DeleteObject(HGDIOBJ(font.0));
            }
            if let Some(brush) = self.brush {
                let _ = DeleteObject(HGDIOBJ(brush.0));
            }
            if let Some(icon) = self.icon
                && let Err(err) = DestroyIcon(icon)
            {
                log::debug!("Win32Surface: DestroyIcon failed: {err:?}");
            }
            for bitmap in self.bitmaps {
                let _ = DeleteObject(HGDIOBJ(bitmap.0));
            }
        }
    }
}

pub struct Win32Surface {
    h_instance: HINSTANCE,
    windows: HashMap<NativeHandle, WindowResources>,
}

impl Win32Surface {
    pub fn new() -> PlatformResult<Self> {
        let h_instance = HINSTANCE::from(unsafe { GetModuleHandleW(None) }?);

        let icc = INITCOMMONCONTROLSEX {
            dwSize: std::mem::size_of::<INITCOMMONCONTROLSEX>() as u32,
            dwICC: ICC_STANDARD_CLASSES | ICC_BAR_CLASSES | ICC_UPDOWN_CLASS,
        };
        if !unsafe { InitCommonControlsEx(&icc) }.as_bool() {
            log::warn!("Win32Surface: InitCommonControlsEx failed; trackbars and spins may not appear");
        }

        window_common::register_window_class(h_instance)?;
        Ok(Self {
            h_instance,
            windows: HashMap::new(),
        })
    }

    // Frees resources of windows destroyed behind our back (e.g. by their parent).
    fn release_stale_windows(&mut self) {
        let stale: Vec<NativeHandle> = self
            .windows
            .keys()
            .copied()
            .filter(|&window| !self.is_window(window))
            .collect();
        for window in stale {
            if let Some(resources) = self.windows.remove(&window) {
                log::debug!("Win32Surface: Releasing resources of vanished window {window:?}");
                resources.release();
            }
        }
    }

    fn font_for(&self, window: NativeHandle) -> HFONT {
        self.windows
            .get(&window)
            .and_then(|resources| resources.font)
            .unwrap_or_else(styling_handler::default_gui_font)
    }
}

fn load_window_icon(hwnd: HWND, path: &Path) -> Option<HICON> {
    let wide_path = HSTRING::from(path.as_os_str());
    let handle = match unsafe {
        LoadImageW(
            None,
            &wide_path,
            IMAGE_ICON,
            0,
            0,
            LR_LOADFROMFILE | LR_DEFAULTSIZE,
        )
    } {
        Ok(handle) if !handle.is_invalid() => handle,
        Ok(_) => {
            log::warn!("Win32Surface: No icon loaded from '{}'", path.display());
            return None;
        }
        Err(err) => {
            log::warn!(
                "Win32Surface: Could not load icon '{}': {err:?}",
                path.display()
            );
            return None;
        }
    };
    let icon = HICON(handle.0);
    for size in [ICON_SMALL, ICON_BIG] {
        unsafe {
            SendMessageW(
                hwnd,
                WM_SETICON,
                Some(windows::Win32::Foundation::WPARAM(size)),
                Some(windows::Win32::Foundation::LPARAM(icon.0 as isize)),
            );
        }
    }
    Some(icon)
}

fn bitmap_handle(bitmap: HBITMAP) -> NativeHandle {
    NativeHandle(bitmap.0 as usize)
}

impl ControlSurface for Win32Surface {
    fn create_dialog_window(
        &mut self,
        config: &DialogConfig,
        router: NotificationRouter,
    ) -> PlatformResult<NativeHandle> {
        self.release_stale_windows();

        let mut resources = WindowResources::default();
        if let Some(description) = &config.font {
            match styling_handler::create_font(description) {
                Ok(font) => resources.font = Some(font),
                Err(err) => log::warn!("Win32Surface: Using the default font: {err}"),
            }
        }
        if let Some(colors) = config.colors {
            let brush =
                unsafe { CreateSolidBrush(styling_handler::color_to_colorref(&colors.background)) };
            resources.brush = (!brush.is_invalid()).then_some(brush);
        }

        let context = WindowCreationContext {
            router,
            background_brush: resources.brush,
        };
        let hwnd = match window_common::create_dialog_window(
            self.h_instance,
            &config.title,
            config.frame,
            context,
        ) {
            Ok(hwnd) => hwnd,
            Err(err) => {
                resources.release();
                return Err(err);
            }
        };

        let font = resources
            .font
            .unwrap_or_else(styling_handler::default_gui_font);
        styling_handler::apply_font(hwnd, font);
        if let Some(icon_path) = &config.icon_path {
            resources.icon = load_window_icon(hwnd, icon_path);
        }

        let window = native_of(hwnd);
        self.windows.insert(window, resources);
        Ok(window)
    }

    fn create_control(
        &mut self,
        window: NativeHandle,
        id: ControlId,
        control: &Control,
    ) -> PlatformResult<CreatedControl> {
        let host = ChildHost {
            parent: hwnd_of(window),
            h_instance: self.h_instance,
            font: self.font_for(window),
        };
        let frame = control.frame();
        let extra = control.extra_style();

        let created = match control.payload() {
            ControlPayload::CheckBox { label, checked } => CreatedControl::single(native_of(
                checkbox_handler::create_checkbox(&host, id, frame, label, *checked, extra)?,
            )),
            ControlPayload::RadioButton {
                label,
                first,
                selected,
                ..
            } => CreatedControl::single(native_of(radiobutton_handler::create_radiobutton(
                &host, id, frame, label, *first, *selected, extra,
            )?)),
            ControlPayload::Slider {
                min,
                max,
                value,
                tick,
                show_value,
            } => {
                let slider = slider_handler::create_slider(
                    &host, id, frame, *min, *max, *value, *tick, *show_value, extra,
                )?;
                CreatedControl {
                    handle: native_of(slider.trackbar),
                    companion: slider.value_label.map(native_of),
                    bitmap: None,
                }
            }
            ControlPayload::Edit { text, multiline } => CreatedControl::single(native_of(
                input_handler::create_edit(&host, id, frame, text, *multiline, extra)?,
            )),
            ControlPayload::ComboBox(choice) => {
                CreatedControl::single(native_of(combobox_handler::create_choice_control(
                    &host,
                    id,
                    frame,
                    ChoiceStyle::Combo,
                    &choice.items,
                    choice.index,
                    extra,
                )?))
            }
            ControlPayload::ListBox(choice) => {
                CreatedControl::single(native_of(combobox_handler::create_choice_control(
                    &host,
                    id,
                    frame,
                    ChoiceStyle::List,
                    &choice.items,
                    choice.index,
                    extra,
                )?))
            }
            ControlPayload::Spin { min, max, value } => {
                let spin =
                    spin_handler::create_spin(&host, id, frame, *min, *max, *value, extra)?;
                CreatedControl {
                    handle: native_of(spin.updown),
                    companion: Some(native_of(spin.buddy)),
                    bitmap: None,
                }
            }
            ControlPayload::Button { text, appearance } => {
                let hwnd = button_handler::create_button(
                    &host,
                    id,
                    frame,
                    text,
                    appearance.is_owner_drawn(),
                    extra,
                )?;
                let bitmap = match appearance {
                    crate::control::ButtonAppearance::Picture { bitmap_path } => {
                        button_handler::load_button_bitmap(bitmap_path)
                    }
                    _ => None,
                };
                if let Some(bitmap) = bitmap {
                    self.windows.entry(window).or_default().bitmaps.push(bitmap);
                }
                CreatedControl {
                    handle: native_of(hwnd),
                    companion: None,
                    bitmap: bitmap.map(bitmap_handle),
                }
            }
            ControlPayload::Group { text } => CreatedControl::single(native_of(
                label_handler::create_label(&host, id, frame, LabelKind::Group, text, extra)?,
            )),
            ControlPayload::Static { text } => CreatedControl::single(native_of(
                label_handler::create_label(&host, id, frame, LabelKind::Text, text, extra)?,
            )),
            ControlPayload::Hyperlink { text, .. } => CreatedControl::single(native_of(
                label_handler::create_label(&host, id, frame, LabelKind::Hyperlink, text, extra)?,
            )),
        };
        Ok(created)
    }

    fn show_window(&mut self, window: NativeHandle) {
        let hwnd = hwnd_of(window);
        unsafe {
            let _ = ShowWindow(hwnd, SW_SHOW);
            let _ = UpdateWindow(hwnd);
        }
    }

    fn destroy_window(&mut self, window: NativeHandle) {
        window_common::destroy_native_window(hwnd_of(window));
        if let Some(resources) = self.windows.remove(&window) {
            resources.release();
        }
    }

    fn is_window(&self, window: NativeHandle) -> bool {
        unsafe { IsWindow(Some(hwnd_of(window))) }.as_bool()
    }

    fn set_enabled(&mut self, target: NativeHandle, enabled: bool) {
        unsafe {
            let _ = EnableWindow(hwnd_of(target), enabled);
        }
    }

    fn disable_theme(&mut self, target: NativeHandle) {
        let empty = HSTRING::new();
        if let Err(err) = unsafe { SetWindowTheme(hwnd_of(target), &empty, &empty) } {
            log::debug!("Win32Surface: SetWindowTheme failed for {target:?}: {err:?}");
        }
    }

    fn set_checked(&mut self, target: NativeHandle, checked: bool) {
        checkbox_handler::set_checked(hwnd_of(target), checked);
    }

    fn is_checked(&self, target: NativeHandle) -> bool {
        checkbox_handler::read_checkbox_state(hwnd_of(target))
    }

    fn set_text(&mut self, target: NativeHandle, text: &str) {
        if let Err(err) = unsafe { SetWindowTextW(hwnd_of(target), &HSTRING::from(text)) } {
            log::warn!("Win32Surface: SetWindowTextW failed for {target:?}: {err:?}");
        }
    }

    fn text(&self, target: NativeHandle) -> String {
        window_common::read_window_text(hwnd_of(target)).unwrap_or_else(|err| {
            log::warn!("Win32Surface: Reading text of {target:?} failed: {err}");
            String::new()
        })
    }

    fn set_items(&mut self, target: NativeHandle, style: ChoiceStyle, items: &[String]) {
        combobox_handler::set_items(hwnd_of(target), style, items);
    }

    fn set_selection(&mut self, target: NativeHandle, style: ChoiceStyle, index: Option<usize>) {
        combobox_handler::set_selection(hwnd_of(target), style, index);
    }

    fn selection(&self, target: NativeHandle, style: ChoiceStyle) -> Option<usize> {
        combobox_handler::read_selection(hwnd_of(target), style)
    }

    fn set_slider_position(&mut self, target: NativeHandle, position: i32) {
        slider_handler::set_position(hwnd_of(target), position);
    }

    fn slider_position(&self, target: NativeHandle) -> i32 {
        slider_handler::read_position(hwnd_of(target))
    }

    fn set_spin_position(&mut self, target: NativeHandle, position: i32) {
        spin_handler::set_position(hwnd_of(target), position);
    }

    fn redraw(&mut self, target: NativeHandle) {
        unsafe {
            let _ = InvalidateRect(Some(hwnd_of(target)), None, true);
        }
    }

    fn open_link(&mut self, action: &str) {
        let result = unsafe {
            ShellExecuteW(
                None,
                w!("open"),
                &HSTRING::from(action),
                PCWSTR::null(),
                PCWSTR::null(),
                SW_SHOWNORMAL,
            )
        };
        if (result.0 as isize) <= SHELL_EXECUTE_MIN_SUCCESS {
            log::warn!(
                "Win32Surface: ShellExecuteW('{action}') failed with code {}",
                result.0 as isize
            );
        } else {
            log::debug!("Win32Surface: Opened '{action}'");
        }
    }

    fn confirm(&mut self, owner: Option<NativeHandle>, caption: &str, message: &str) -> bool {
        let answer = unsafe {
            MessageBoxW(
                owner.map(hwnd_of),
                &HSTRING::from(message),
                &HSTRING::from(caption),
                MB_YESNO | MB_ICONQUESTION,
            )
        };
        answer == IDYES
    }

    fn report_error(&mut self, owner: Option<NativeHandle>, caption: &str, message: &str) {
        unsafe {
            MessageBoxW(
                owner.map(hwnd_of),
                &HSTRING::from(message),
                &HSTRING::from(caption),
                MB_OK | MB_ICONERROR,
            );
        }
    }
}

impl Drop for Win32Surface {
    fn drop(&mut self) {
        for (window, resources) in self.windows.drain() {
            log::debug!("Win32Surface: Releasing resources of {window:?}");
            resources.release();
        }
        window_common::unregister_window_class(self.h_instance);
    }
}

impl Dialog {
    /*
     * Offers a queued message to the dialog before it is translated and
     * dispatched. Key presses and releases inside the dialog are reported to
     * the host as WM_KEYDOWN / WM_KEYUP events; Enter in a single-line edit
     * commits it (value 1). Tab and arrow navigation go through
     * IsDialogMessageW. Returns true when the message was consumed and must
     * not be dispatched.
     */
    pub fn pre_translate_message(&self, msg: &MSG) -> bool {
        let Some(window) = self.window_handle() else {
            return false;
        };
        let hwnd_dialog = hwnd_of(window);
        let belongs_to_dialog =
            msg.hwnd == hwnd_dialog || unsafe { IsChild(hwnd_dialog, msg.hwnd) }.as_bool();
        if !belongs_to_dialog {
            return false;
        }

        if msg.message == WM_KEYDOWN || msg.message == WM_KEYUP {
            let router = self.router();
            let pressed = msg.message == WM_KEYDOWN;
            router.route(Notification::Key {
                pressed,
                virtual_key: msg.wParam.0 as u32,
            });
            if pressed && msg.wParam.0 == VK_RETURN.0 as usize {
                let id = ControlId::new(unsafe { GetDlgCtrlID(msg.hwnd) });
                if router.control_kind(id) == Some(ControlKind::Edit)
                    && input_handler::is_single_line_edit(msg.hwnd)
                {
                    router.route(Notification::EditCommitted { id });
                    return true;
                }
            }
        }

        // The key callback may have closed the dialog.
        if !self.is_open() {
            return true;
        }
        unsafe { IsDialogMessageW(hwnd_dialog, msg) }.as_bool()
    }

    /*
     * Runs a message loop until this dialog is closed. A WM_QUIT received on
     * the way is re-posted for the host's outer loop.
     */
    pub fn run_message_loop(&self) -> PlatformResult<()> {
        let mut msg = MSG::default();
        while self.is_open() {
            let result = unsafe { GetMessageW(&mut msg, None, 0, 0) };
            match result.0 {
                -1 => {
                    let error = unsafe { GetLastError() };
                    log::error!("Dialog: GetMessageW failed: {error:?}");
                    return Err(PlatformError::OperationFailed(format!(
                        "GetMessageW failed: {error:?}"
                    )));
                }
                0 => {
                    log::debug!("Dialog: WM_QUIT received; leaving message loop");
                    unsafe { PostQuitMessage(msg.wParam.0 as i32) };
                    break;
                }
                _ => {
                    if !self.pre_translate_message(&msg) {
                        unsafe {
                            let _ = TranslateMessage(&msg);
                            DispatchMessageW(&msg);
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
