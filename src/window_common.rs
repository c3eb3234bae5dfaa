/*
 * Common Win32 windowing functionality for dialogs: window class
 * registration, dialog window creation and the window procedure that turns
 * raw messages into portable `Notification`s.
 *
 * Each dialog window owns a boxed `WindowCreationContext` stored in its
 * GWLP_USERDATA slot. The context carries the dialog's `NotificationRouter`,
 * so the procedure never needs process-wide state to find the dialog that a
 * message belongs to. Control-specific drawing is delegated to the handlers
 * in `crate::controls`.
 */
use crate::control::ControlKind;
use crate::controls::{button_handler, label_handler, paint_router, styling_handler};
use crate::dialog::NotificationRouter;
use crate::error::{PlatformError, Result as PlatformResult};
use crate::surface::OwnerDrawSpec;
use crate::types::{ControlId, Frame, NativeHandle, Notification, RouteOutcome, ScrollCode};

use windows::Win32::{
    Foundation::{ERROR_INVALID_WINDOW_HANDLE, GetLastError, HINSTANCE, HWND, LPARAM, LRESULT, WPARAM},
    Graphics::Gdi::{COLOR_BTNFACE, HBRUSH, HDC, SetBkColor, SetTextColor},
    UI::Controls::{DRAWITEMSTRUCT, NMHDR, NMUPDOWN},
    UI::WindowsAndMessaging::*, // This list is massive, just import all of them.
};
use windows::core::{HSTRING, PCWSTR, w};

use std::ffi::c_void;

pub(crate) const DIALOG_CLASS_NAME: PCWSTR = w!("DialogDuct_DialogWindowClass");

// WM_COMMAND notification codes.
const BN_CLICKED: u32 = 0;
const STN_CLICKED: u32 = 0;
const CBN_SELCHANGE: u32 = 1;
const LBN_SELCHANGE: u32 = 1;
const EN_CHANGE: u32 = 0x0300;

// UDN_FIRST - 1
const UDN_DELTAPOS: u32 = -722i32 as u32;

const DIALOG_STYLE: WINDOW_STYLE = WINDOW_STYLE(
    WS_OVERLAPPED.0 | WS_CAPTION.0 | WS_SYSMENU.0 | WS_MINIMIZEBOX.0 | WS_CLIPCHILDREN.0,
);

/*
 * Per-window data handed to CreateWindowExW through `lpCreateParams`. Owned by
 * the window from WM_NCCREATE until WM_NCDESTROY.
 */
#[derive(Clone)]
pub(crate) struct WindowCreationContext {
    pub(crate) router: NotificationRouter,
    // Owned by the surface; only borrowed here for WM_CTLCOLOR* and owner draw.
    pub(crate) background_brush: Option<HBRUSH>,
}

/// Describes one child control for `create_child_window`.
pub(crate) struct ChildWindowSpec<'a> {
    pub(crate) class: PCWSTR,
    pub(crate) text: &'a str,
    pub(crate) style: WINDOW_STYLE,
    pub(crate) ex_style: WINDOW_EX_STYLE,
    pub(crate) frame: Frame,
    pub(crate) id: ControlId,
}

pub(crate) fn hwnd_of(handle: NativeHandle) -> HWND {
    HWND(handle.0 as *mut c_void)
}

pub(crate) fn native_of(hwnd: HWND) -> NativeHandle {
    NativeHandle(hwnd.0 as usize)
}

/*
 * Registers the dialog window class if not already registered. All dialogs
 * of the process share it; the per-dialog data travels in the creation
 * context instead.
 */
pub(crate) fn register_window_class(h_instance: HINSTANCE) -> PlatformResult<()> {
    unsafe {
        let mut wc_test = WNDCLASSEXW::default();
        if GetClassInfoExW(Some(h_instance), DIALOG_CLASS_NAME, &mut wc_test).is_ok() {
            log::debug!("Platform: Dialog window class already registered.");
            return Ok(());
        }

        let wc = WNDCLASSEXW {
            cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
            style: CS_HREDRAW | CS_VREDRAW,
            lpfnWndProc: Some(facade_wnd_proc_router),
            cbClsExtra: 0,
            cbWndExtra: 0,
            hInstance: h_instance,
            hIcon: LoadIconW(None, IDI_APPLICATION)?,
            hCursor: LoadCursorW(None, IDC_ARROW)?,
            hbrBackground: HBRUSH((COLOR_BTNFACE.0 + 1) as *mut c_void),
            lpszMenuName: PCWSTR::null(),
            lpszClassName: DIALOG_CLASS_NAME,
            hIconSm: LoadIconW(None, IDI_APPLICATION)?,
        };

        if RegisterClassExW(&wc) == 0 {
            let error = GetLastError();
            log::error!("Platform: RegisterClassExW failed: {error:?}");
            Err(PlatformError::InitializationFailed(format!(
                "RegisterClassExW failed: {error:?}"
            )))
        } else {
            log::debug!("Platform: Dialog window class registered successfully.");
            Ok(())
        }
    }
}

/// Best effort; fails harmlessly while other windows of the class still exist.
pub(crate) fn unregister_window_class(h_instance: HINSTANCE) {
    if let Err(err) = unsafe { UnregisterClassW(DIALOG_CLASS_NAME, Some(h_instance)) } {
        log::debug!("Platform: UnregisterClassW failed: {err:?}");
    }
}

/*
 * Creates the top-level dialog window. `context` is moved into the window
 * and released by the window procedure on WM_NCDESTROY.
 */
pub(crate) fn create_dialog_window(
    h_instance: HINSTANCE,
    title: &str,
    frame: Frame,
    context: WindowCreationContext,
) -> PlatformResult<HWND> {
    let creation_context = Box::new(context);
    unsafe {
        let hwnd = CreateWindowExW(
            WS_EX_DLGMODALFRAME | WS_EX_CONTROLPARENT,
            DIALOG_CLASS_NAME,
            &HSTRING::from(title),
            DIALOG_STYLE,
            frame.x,
            frame.y,
            frame.width,
            frame.height,
            None,
            None,
            Some(h_instance),
            Some(Box::into_raw(creation_context) as *mut c_void),
        )?;
        log::debug!("Platform: Created dialog window '{title}' as {hwnd:?}");
        Ok(hwnd)
    }
}

/// Creates one child control of `parent` at an absolute client position.
pub(crate) fn create_child_window(
    parent: HWND,
    h_instance: HINSTANCE,
    spec: &ChildWindowSpec<'_>,
) -> PlatformResult<HWND> {
    let hwnd = unsafe {
        CreateWindowExW(
            spec.ex_style,
            spec.class,
            &HSTRING::from(spec.text),
            spec.style,
            spec.frame.x,
            spec.frame.y,
            spec.frame.width,
            spec.frame.height,
            Some(parent),
            Some(HMENU(spec.id.raw() as isize as *mut c_void)),
            Some(h_instance),
            None,
        )
    }
    .map_err(|err| {
        log::error!(
            "Platform: CreateWindowExW failed for control ID {}: {err:?}",
            spec.id.raw()
        );
        PlatformError::from(err)
    })?;
    log::trace!(
        "Platform: Created child {hwnd:?} (ID {}) with style {:#x}",
        spec.id.raw(),
        spec.style.0
    );
    Ok(hwnd)
}

/*
 * Main window procedure router. Retrieves the `WindowCreationContext` and
 * calls `handle_window_message`.
 */
unsafe extern "system" fn facade_wnd_proc_router(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    let context_ptr = if msg == WM_NCCREATE {
        let create_struct = unsafe { &*(lparam.0 as *const CREATESTRUCTW) };
        let context_raw_ptr = create_struct.lpCreateParams as *mut WindowCreationContext;
        unsafe { SetWindowLongPtrW(hwnd, GWLP_USERDATA, context_raw_ptr as isize) };
        context_raw_ptr
    } else {
        unsafe { GetWindowLongPtrW(hwnd, GWLP_USERDATA) as *mut WindowCreationContext }
    };

    if context_ptr.is_null() {
        return unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) };
    }

    // Routing a message can destroy the window, and the nested WM_NCDESTROY
    // frees the boxed context. Nothing may borrow from the box across it.
    let context = unsafe { detach_context(context_ptr) };
    let result = handle_window_message(&context, hwnd, msg, wparam, lparam);

    if msg == WM_NCDESTROY {
        unsafe { SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0) };
        let _ = unsafe { Box::from_raw(context_ptr) };
        log::trace!("Platform: Released window context for {hwnd:?}");
    }
    result
}

/// Owned copy of the window's context, independent of the box's lifetime.
unsafe fn detach_context(context_ptr: *const WindowCreationContext) -> WindowCreationContext {
    unsafe { (*context_ptr).clone() }
}

fn handle_window_message(
    context: &WindowCreationContext,
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    let router = &context.router;
    let mut lresult_override: Option<LRESULT> = None;

    match msg {
        WM_COMMAND => handle_wm_command(router, wparam, lparam),
        WM_HSCROLL => lresult_override = handle_wm_hscroll(router, wparam, lparam),
        WM_NOTIFY => lresult_override = handle_wm_notify(router, lparam),
        WM_DRAWITEM => lresult_override = handle_wm_drawitem(context, lparam),
        WM_SETCURSOR => lresult_override = handle_wm_setcursor(router, wparam),
        WM_CTLCOLORDLG | WM_CTLCOLORSTATIC | WM_CTLCOLORBTN => {
            lresult_override = handle_wm_ctlcolor(context, msg, wparam, lparam);
        }
        WM_CLOSE => {
            log::debug!("Platform: WM_CLOSE received for {hwnd:?}");
            // Anything but Ignored means the dialog owns the close; the default would destroy.
            if router.route(Notification::CloseRequested) != RouteOutcome::Ignored {
                lresult_override = Some(LRESULT(0));
            }
        }
        WM_DESTROY => {
            log::debug!("Platform: WM_DESTROY received for {hwnd:?}");
            router.route(Notification::Destroyed);
        }
        _ => {}
    }

    match lresult_override {
        Some(lresult) => lresult,
        None => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
    }
}

/*
 * Maps a WM_COMMAND notification code from a control of `kind` to the
 * portable notification, or `None` for codes the dialog does not track.
 */
pub(crate) fn decode_command(kind: ControlKind, id: ControlId, code: u32) -> Option<Notification> {
    match kind {
        ControlKind::CheckBox | ControlKind::RadioButton | ControlKind::Button
            if code == BN_CLICKED =>
        {
            Some(Notification::Clicked { id })
        }
        ControlKind::Hyperlink if code == STN_CLICKED => Some(Notification::Clicked { id }),
        ControlKind::ComboBox if code == CBN_SELCHANGE => Some(Notification::SelectionChanged { id }),
        ControlKind::ListBox if code == LBN_SELCHANGE => Some(Notification::SelectionChanged { id }),
        ControlKind::Edit if code == EN_CHANGE => Some(Notification::TextChanged { id }),
        _ => None,
    }
}

fn handle_wm_command(router: &NotificationRouter, wparam: WPARAM, lparam: LPARAM) {
    // Menus and accelerators carry no control handle.
    if lparam.0 == 0 {
        return;
    }
    let id = ControlId::new(loword_from_wparam(wparam));
    let code = highord_from_wparam(wparam) as u32;
    // Unknown while the dialog is busy creating or updating controls.
    let Some(kind) = router.control_kind(id) else {
        log::trace!("Platform: WM_COMMAND {code:#x} for unresolved ID {}", id.raw());
        return;
    };
    if let Some(notification) = decode_command(kind, id, code) {
        router.route(notification);
    }
}

fn handle_wm_hscroll(router: &NotificationRouter, wparam: WPARAM, lparam: LPARAM) -> Option<LRESULT> {
    if lparam.0 == 0 {
        return None;
    }
    let hwnd_trackbar = HWND(lparam.0 as *mut c_void);
    let id = ControlId::new(unsafe { GetDlgCtrlID(hwnd_trackbar) });
    let code = ScrollCode::from_raw(loword_from_wparam(wparam) as u32);
    match router.route(Notification::Scrolled { id, code }) {
        RouteOutcome::Ignored => None,
        _ => Some(LRESULT(0)),
    }
}

fn handle_wm_notify(router: &NotificationRouter, lparam: LPARAM) -> Option<LRESULT> {
    let header = unsafe { (lparam.0 as *const NMHDR).as_ref() }?;
    if header.code != UDN_DELTAPOS {
        return None;
    }
    let updown = unsafe { &*(lparam.0 as *const NMUPDOWN) };
    let notification = Notification::SpinDelta {
        id: ControlId::new(header.idFrom as i32),
        position: updown.iPos,
        delta: updown.iDelta,
    };
    match router.route(notification) {
        // Non-zero vetoes the up-down control's own position change.
        RouteOutcome::Handled => Some(LRESULT(1)),
        _ => None,
    }
}

fn handle_wm_drawitem(context: &WindowCreationContext, lparam: LPARAM) -> Option<LRESULT> {
    let dis = unsafe { (lparam.0 as *const DRAWITEMSTRUCT).as_ref() }?;
    let spec = context
        .router
        .owner_draw_spec(ControlId::new(dis.CtlID as i32))?;
    match spec {
        OwnerDrawSpec::Hyperlink { text } => {
            label_handler::draw_hyperlink(dis, &text, context.background_brush)
        }
        OwnerDrawSpec::ColoredButton {
            text,
            background,
            text_color,
        } => button_handler::draw_colored_button(dis, &text, background, text_color),
        OwnerDrawSpec::PictureButton { text, bitmap } => {
            button_handler::draw_picture_button(dis, &text, bitmap)
        }
    }
    Some(LRESULT(1))
}

fn handle_wm_setcursor(router: &NotificationRouter, wparam: WPARAM) -> Option<LRESULT> {
    let hwnd_under_cursor = HWND(wparam.0 as *mut c_void);
    let id = unsafe { GetDlgCtrlID(hwnd_under_cursor) };
    if id == 0 || !router.is_hyperlink(ControlId::new(id)) {
        return None;
    }
    let cursor = unsafe { LoadCursorW(None, IDC_HAND) }.ok()?;
    unsafe { SetCursor(Some(cursor)) };
    Some(LRESULT(1))
}

fn handle_wm_ctlcolor(
    context: &WindowCreationContext,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> Option<LRESULT> {
    let colors = context.router.colors()?;
    let brush = context.background_brush?;
    let kind = if msg == WM_CTLCOLORDLG {
        None
    } else {
        let hwnd_control = HWND(lparam.0 as *mut c_void);
        let id = unsafe { GetDlgCtrlID(hwnd_control) };
        context.router.control_kind(ControlId::new(id))
    };
    match paint_router::resolve_paint_route(kind, msg) {
        paint_router::PaintRoute::Default => None,
        paint_router::PaintRoute::Dialog
        | paint_router::PaintRoute::LabelStatic
        | paint_router::PaintRoute::Button => {
            let hdc = HDC(wparam.0 as *mut c_void);
            unsafe {
                SetTextColor(hdc, styling_handler::color_to_colorref(&colors.text));
                SetBkColor(hdc, styling_handler::color_to_colorref(&colors.background));
            }
            Some(LRESULT(brush.0 as isize))
        }
    }
}

#[inline]
pub(crate) fn loword_from_wparam(wparam: WPARAM) -> i32 {
    (wparam.0 & 0xFFFF) as i32
}
#[inline]
pub(crate) fn highord_from_wparam(wparam: WPARAM) -> i32 {
    ((wparam.0 >> 16) & 0xFFFF) as i32
}

// Reads the full contents of an EDIT (or any text-bearing) control without truncation.
pub(crate) fn read_window_text(hwnd: HWND) -> PlatformResult<String> {
    read_window_text_with(
        || unsafe { GetWindowTextLengthW(hwnd) },
        |buf| unsafe { GetWindowTextW(hwnd, buf) },
    )
}

// Internal helper that can be unit tested with injected getters.
fn read_window_text_with<FLen, FGet>(get_len: FLen, get_text: FGet) -> PlatformResult<String>
where
    FLen: Fn() -> i32,
    FGet: Fn(&mut [u16]) -> i32,
{
    let len = get_len();
    if len < 0 {
        return Err(PlatformError::OperationFailed(
            "GetWindowTextLengthW returned negative length".into(),
        ));
    }

    let mut buffer = vec![0u16; len as usize + 1];
    let copied = get_text(&mut buffer);
    if copied < 0 {
        return Err(PlatformError::OperationFailed(
            "GetWindowTextW returned negative length".into(),
        ));
    }

    buffer.truncate(copied as usize);
    Ok(String::from_utf16_lossy(&buffer))
}

/*
 * Destroys a native window. A handle that is already gone is not an error:
 * the user may have closed the window before the dialog got to it.
 */
pub(crate) fn destroy_native_window(hwnd: HWND) {
    log::debug!("Platform: Calling DestroyWindow for HWND {hwnd:?}");
    unsafe {
        if DestroyWindow(hwnd).is_err() {
            let last_error = GetLastError();
            if last_error.0 != ERROR_INVALID_WINDOW_HANDLE.0 {
                log::error!("Platform: DestroyWindow for HWND {hwnd:?} failed: {last_error:?}");
            } else {
                log::debug!(
                    "Platform: DestroyWindow for HWND {hwnd:?} reported invalid handle (already destroyed?)."
                );
            }
        }
    }
}
